use std::path::PathBuf;

use dora_eda::{DataSource, DoraError, FeaturePlot, Mapper, Session, SplitConfig};

use crate::color::FeatureColors;

// ---------------------------------------------------------------------------
// User actions
// ---------------------------------------------------------------------------

/// Everything the panels can ask for. Collected while drawing and applied
/// afterwards so the UI never holds a borrow of the session while mutating it.
#[derive(Debug, Clone)]
pub enum Action {
    Open(PathBuf),
    SetOutput(String),
    RemoveFeature(String),
    OneHot(String),
    Derive {
        source: String,
        target: String,
        mapper: usize,
    },
    Impute,
    Scale,
    Snapshot(String),
    UseSnapshot(String),
    DeleteSnapshot(String),
    /// Reload the initial table and re-apply the current log.
    Replay,
    Split,
}

/// Mappers offered by the derive form.
pub fn builtin_mappers() -> Vec<Mapper> {
    vec![
        Mapper::numeric("double", |x| x * 2.0),
        Mapper::numeric("square", |x| x * x),
        Mapper::numeric("abs", f64::abs),
        Mapper::numeric("ln", f64::ln),
        Mapper::numeric("sqrt", f64::sqrt),
        Mapper::new("is_missing", |v: &dora_eda::Value| {
            dora_eda::Value::Integer(i64::from(v.is_null()))
        }),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Table,
    Explore,
}

/// Inputs of the "derive feature" form.
#[derive(Debug, Clone, Default)]
pub struct DeriveForm {
    pub source: String,
    pub target: String,
    pub mapper: usize,
}

// ---------------------------------------------------------------------------
// Explorer state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct ExplorerState {
    pub session: Session,

    /// One entry per input feature: its plot, or why it cannot be plotted.
    pub plots: Vec<(String, Result<FeaturePlot, String>)>,

    pub colors: FeatureColors,

    pub tab: Tab,

    pub mappers: Vec<Mapper>,
    pub derive: DeriveForm,

    /// Name typed into the snapshot box.
    pub snapshot_name: String,

    pub split_config: SplitConfig,
    /// Row counts of the last split preview (training, validation).
    pub split_preview: Option<(usize, usize)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            session: Session::new(),
            plots: Vec::new(),
            colors: FeatureColors::default(),
            tab: Tab::Table,
            mappers: builtin_mappers(),
            derive: DeriveForm::default(),
            snapshot_name: "start".to_string(),
            split_config: SplitConfig::default(),
            split_preview: None,
            status_message: None,
        }
    }
}

impl ExplorerState {
    pub fn new(session: Session, split_config: SplitConfig) -> Self {
        let mut state = Self {
            session,
            split_config,
            ..Self::default()
        };
        state.refresh();
        state
    }

    /// Apply one user action to the session, reporting failures in the
    /// status line.
    pub fn perform(&mut self, action: Action) {
        let result = self.dispatch(&action);
        match result {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::warn!("{action:?} failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.refresh();
    }

    fn dispatch(&mut self, action: &Action) -> Result<(), DoraError> {
        let session = &mut self.session;
        match action {
            Action::Open(path) => {
                session.configure(Some(DataSource::Csv(path.clone())), None)?;
                self.split_preview = None;
                Ok(())
            }
            Action::SetOutput(col) => session.configure(None, Some(col)),
            Action::RemoveFeature(col) => session.remove_feature(col),
            Action::OneHot(col) => session.extract_ordinal_feature(col),
            Action::Derive {
                source,
                target,
                mapper,
            } => {
                let mapper = self
                    .mappers
                    .get(*mapper)
                    .cloned()
                    .ok_or_else(|| DoraError::NumericOperation("no mapper selected".into()))?;
                session.extract_feature(source, target, mapper)
            }
            Action::Impute => session.impute_missing_values(),
            Action::Scale => session.scale_input_values(),
            Action::Snapshot(name) => session.snapshot(name),
            Action::UseSnapshot(name) => session.use_snapshot(name),
            Action::DeleteSnapshot(name) => session.remove_snapshot(name),
            Action::Replay => {
                let log = session.log().clone();
                let initial = session.initial_table()?.clone();
                session.configure(Some(DataSource::Table(initial)), None)?;
                session.replay(&log)
            }
            Action::Split => {
                let split = session.split_with_config(&self.split_config)?;
                self.split_preview = Some((split.training.height(), split.validation.height()));
                Ok(())
            }
        }
    }

    /// Recompute the cached feature plots and colours.
    pub fn refresh(&mut self) {
        let Ok(inputs) = self.session.input_columns() else {
            self.plots.clear();
            return;
        };
        self.colors = FeatureColors::new(&inputs);
        self.plots = inputs
            .into_iter()
            .map(|name| {
                let plot = self.session.plot_feature(&name).map_err(|e| e.to_string());
                (name, plot)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dora_eda::{Column, Table, Value};

    fn state() -> ExplorerState {
        let table = Table::new(vec![
            Column::new("A", vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]),
            Column::new("B", vec![Value::Null, Value::Integer(5), Value::Integer(8)]),
            Column::new("D", vec!["left".into(), "right".into(), "left".into()]),
        ])
        .unwrap();
        let session = Session::from_source(table, Some("A")).unwrap();
        ExplorerState::new(session, SplitConfig::default())
    }

    #[test]
    fn test_refresh_reports_unplottable_features() {
        let state = state();
        assert_eq!(state.plots.len(), 2);
        assert!(state.plots[0].1.is_ok());
        assert!(state.plots[1].1.is_err());
    }

    #[test]
    fn test_failed_action_sets_status_and_keeps_log() {
        let mut state = state();
        state.perform(Action::Impute);
        assert!(state.status_message.is_some());
        assert!(state.session.log().is_empty());

        state.perform(Action::OneHot("D".into()));
        state.perform(Action::Impute);
        assert!(state.status_message.is_none());
        assert_eq!(state.session.log().len(), 2);
    }

    #[test]
    fn test_replay_rebuilds_from_initial_table() {
        let mut state = state();
        state.perform(Action::OneHot("D".into()));
        state.perform(Action::Derive {
            source: "A".into(),
            target: "A2".into(),
            mapper: 0,
        });
        let before = state.session.table().unwrap().clone();
        state.perform(Action::Replay);
        assert_eq!(state.session.table().unwrap(), &before);
        assert_eq!(state.session.log().len(), 2);
    }

    #[test]
    fn test_split_preview() {
        let mut state = state();
        state.split_config.seed = Some(11);
        state.perform(Action::Split);
        let (train, valid) = state.split_preview.unwrap();
        assert_eq!(train + valid, 3);
    }
}

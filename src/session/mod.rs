//! The exploration session: one live table, the log of transforms applied to
//! it, and named snapshots of the pair.

pub mod history;
pub mod snapshot;

use std::collections::BTreeSet;
use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::data::loader;
use crate::data::model::{Column, Table, Value};
use crate::data::split::{self, SplitConfig, TrainValidationSplit};
use crate::error::{DoraError, Result};
use crate::plot::FeaturePlot;
use crate::stats;

pub use history::{Log, LogEntry, Mapper};
pub use snapshot::{Snapshot, SnapshotStore};

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where `configure` takes its table from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Delimited text file with a header row.
    Csv(PathBuf),
    /// An already-built table.
    Table(Table),
}

impl From<Table> for DataSource {
    fn from(table: Table) -> Self {
        DataSource::Table(table)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Csv(path)
    }
}

impl From<&str> for DataSource {
    fn from(path: &str) -> Self {
        DataSource::Csv(PathBuf::from(path))
    }
}

impl DataSource {
    fn load(self) -> Result<Table> {
        match self {
            DataSource::Table(table) => Ok(table),
            DataSource::Csv(path) => loader::load_file(&path)
                .map_err(|e| DoraError::InvalidSource(format!("{e:#}"))),
        }
    }
}

/// Coarse lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No table loaded yet; only `configure` is useful.
    Unconfigured,
    Ready,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owns the live table and log. Every mutating method either applies its
/// whole effect and appends one log entry, or fails and changes nothing.
#[derive(Debug, Default)]
pub struct Session {
    table: Option<Table>,
    /// Table as loaded, kept for inspection. Never mutated.
    initial: Option<Table>,
    log: Log,
    output: Option<String>,
    snapshots: SnapshotStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Session::new()` followed by `configure(Some(source), output)`.
    pub fn from_source(source: impl Into<DataSource>, output: Option<&str>) -> Result<Self> {
        let mut session = Self::new();
        session.configure(Some(source.into()), output)?;
        Ok(session)
    }

    /// Load a table and/or set the output column.
    ///
    /// Loading resets the log. The loaded table is also kept as the
    /// initial reference copy. Snapshots survive a reload.
    pub fn configure(&mut self, source: Option<DataSource>, output: Option<&str>) -> Result<()> {
        let loaded = source.map(DataSource::load).transpose()?;

        if let Some(table) = loaded {
            log::info!(
                "Loaded table with {} rows and columns {:?}",
                table.height(),
                table.column_names()
            );
            self.initial = Some(table.clone());
            self.table = Some(table);
            self.log.reset();
        }
        if let Some(output) = output {
            log::debug!("Output column set to '{output}'");
            self.output = Some(output.to_string());
        }
        Ok(())
    }

    // -- accessors --

    pub fn state(&self) -> SessionState {
        if self.table.is_some() {
            SessionState::Ready
        } else {
            SessionState::Unconfigured
        }
    }

    pub fn table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or(DoraError::NotLoaded)
    }

    fn table_mut(&mut self) -> Result<&mut Table> {
        self.table.as_mut().ok_or(DoraError::NotLoaded)
    }

    /// The table exactly as last loaded.
    pub fn initial_table(&self) -> Result<&Table> {
        self.initial.as_ref().ok_or(DoraError::NotLoaded)
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn output(&self) -> Result<&str> {
        self.output.as_deref().ok_or(DoraError::OutputNotConfigured)
    }

    /// Column names in table order, without the output column.
    pub fn input_columns(&self) -> Result<Vec<String>> {
        let output = self.output()?;
        Ok(self
            .table()?
            .column_names()
            .into_iter()
            .filter(|name| name != output)
            .collect())
    }

    // -- transforms --

    /// The single logging hook every transform goes through.
    fn record(&mut self, entry: LogEntry) {
        log::debug!("{entry}");
        self.log.append(entry);
    }

    pub fn remove_feature(&mut self, name: &str) -> Result<()> {
        self.table_mut()?.remove_column(name)?;
        self.record(LogEntry::RemoveFeature {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Apply `mapper` to every cell of `source` and store the result as
    /// `target`, replacing a same-named column in place.
    pub fn extract_feature(&mut self, source: &str, target: &str, mapper: Mapper) -> Result<()> {
        let table = self.table_mut()?;
        let values = table
            .column(source)?
            .values
            .iter()
            .map(|v| mapper.apply(v))
            .collect();
        table.upsert_column(Column::new(target, values))?;
        self.record(LogEntry::ExtractFeature {
            source: source.to_string(),
            target: target.to_string(),
            mapper,
        });
        Ok(())
    }

    /// One-hot encode a categorical column.
    ///
    /// Adds one `"<name>=<value>"` indicator column (0/1) per distinct
    /// value, sorted by the value's text, then drops `name`. Missing cells
    /// are 0 in every indicator. Float labels keep their fraction
    /// (`x=1.0`). Fails with `DuplicateColumn` if an indicator name is
    /// already taken by another column.
    pub fn extract_ordinal_feature(&mut self, name: &str) -> Result<()> {
        let table = self.table_mut()?;
        let column = table.column(name)?;

        let labels: BTreeSet<String> = column
            .unique_values()
            .iter()
            .map(Value::to_string)
            .collect();

        let cells: Vec<Option<String>> = column
            .values
            .iter()
            .map(|v| (!v.is_null()).then(|| v.to_string()))
            .collect();

        let mut next = table.clone();
        next.remove_column(name)?;
        for label in &labels {
            let target = format!("{name}={label}");
            if next.contains(&target) {
                return Err(DoraError::DuplicateColumn(target));
            }
            let indicator = cells
                .iter()
                .map(|c| Value::Integer(i64::from(c.as_deref() == Some(label.as_str()))))
                .collect();
            next.upsert_column(Column::new(target, indicator))?;
        }
        *table = next;

        self.record(LogEntry::ExtractOrdinalFeature {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Mean-impute every input column. The output column is never passed to
    /// the kernel.
    pub fn impute_missing_values(&mut self) -> Result<()> {
        self.map_input_columns(stats::impute_mean)?;
        self.record(LogEntry::ImputeMissingValues);
        Ok(())
    }

    /// Standardize every input column to zero mean and unit variance. The
    /// output column is never passed to the kernel.
    pub fn scale_input_values(&mut self) -> Result<()> {
        self.map_input_columns(stats::standardize)?;
        self.record(LogEntry::ScaleInputValues);
        Ok(())
    }

    /// Run `kernel` over every input column, committing only if all succeed.
    fn map_input_columns(&mut self, kernel: fn(&Column) -> Result<Column>) -> Result<()> {
        let inputs = self.input_columns()?;
        let table = self.table_mut()?;
        let transformed = inputs
            .iter()
            .map(|name| table.column(name).and_then(kernel))
            .collect::<Result<Vec<_>>>()?;
        for column in transformed {
            table.upsert_column(column)?;
        }
        Ok(())
    }

    /// Re-apply every entry of `log` in order. Stops at the first failure;
    /// entries before it stay applied and logged.
    pub fn replay(&mut self, log: &Log) -> Result<()> {
        for entry in log {
            self.apply(entry)?;
        }
        Ok(())
    }

    fn apply(&mut self, entry: &LogEntry) -> Result<()> {
        match entry {
            LogEntry::RemoveFeature { name } => self.remove_feature(name),
            LogEntry::ExtractFeature {
                source,
                target,
                mapper,
            } => self.extract_feature(source, target, mapper.clone()),
            LogEntry::ExtractOrdinalFeature { name } => self.extract_ordinal_feature(name),
            LogEntry::ImputeMissingValues => self.impute_missing_values(),
            LogEntry::ScaleInputValues => self.scale_input_values(),
        }
    }

    // -- exploration (not logged) --

    /// Randomly partition the rows; each row lands in training with
    /// probability `ratio`. The live table is untouched.
    pub fn split_training_validation<R: Rng>(
        &self,
        ratio: f64,
        rng: &mut R,
    ) -> Result<TrainValidationSplit> {
        split::split_table(self.table()?, ratio, rng)
    }

    /// [`Self::split_training_validation`] with a seeded or entropy RNG.
    pub fn split_with_config(&self, config: &SplitConfig) -> Result<TrainValidationSplit> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.split_training_validation(config.ratio, &mut rng)
    }

    /// Scatter of `name` against the output column with its linear fit.
    pub fn plot_feature(&self, name: &str) -> Result<FeaturePlot> {
        FeaturePlot::build(self.table()?, name, self.output()?)
    }

    /// [`Self::plot_feature`] for every input column, in column order.
    pub fn explore(&self) -> Result<Vec<FeaturePlot>> {
        self.input_columns()?
            .iter()
            .map(|name| self.plot_feature(name))
            .collect()
    }

    // -- snapshots --

    /// Store a copy of the live table and log under `name`.
    pub fn snapshot(&mut self, name: &str) -> Result<()> {
        let table = self.table.as_ref().ok_or(DoraError::NotLoaded)?;
        self.snapshots.capture(name, table, &self.log);
        log::info!("Captured snapshot '{name}' ({} log entries)", self.log.len());
        Ok(())
    }

    /// Replace the live table and log with copies of snapshot `name`.
    pub fn use_snapshot(&mut self, name: &str) -> Result<()> {
        let Snapshot { table, log: history } = self.snapshots.restore(name)?;
        self.table = Some(table);
        self.log = history;
        log::info!("Restored snapshot '{name}'");
        Ok(())
    }

    pub fn remove_snapshot(&mut self, name: &str) -> Result<()> {
        self.snapshots.remove(name).map(|_| ())
    }

    pub fn has_snapshot(&self, name: &str) -> bool {
        self.snapshots.contains(name)
    }

    /// Snapshot names in sorted order.
    pub fn snapshot_names(&self) -> Vec<String> {
        self.snapshots.names()
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }
}

use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use dora_eda::ColumnKind;

use crate::state::{Action, ExplorerState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – transforms, snapshots and the log
// ---------------------------------------------------------------------------

/// Render the left session panel.
pub fn side_panel(ui: &mut Ui, state: &mut ExplorerState, actions: &mut Vec<Action>) {
    ui.heading("Session");
    ui.separator();

    let Ok(table) = state.session.table() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Owned copies so the widgets below can borrow `state` mutably.
    let columns: Vec<(String, ColumnKind, usize)> = table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.kind(), c.null_count()))
        .collect();
    let output = state.session.output().ok().map(str::to_string);
    let snapshots = state.session.snapshot_names();
    let log_lines = state.session.log().lines();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Output column selector ----
            ui.strong("Output column");
            let selected = output.clone().unwrap_or_else(|| "<none>".to_string());
            egui::ComboBox::from_id_salt("output_column")
                .selected_text(&selected)
                .show_ui(ui, |ui: &mut Ui| {
                    for (name, _, _) in &columns {
                        if ui
                            .selectable_label(output.as_deref() == Some(name.as_str()), name)
                            .clicked()
                        {
                            actions.push(Action::SetOutput(name.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Per-feature transforms ----
            egui::CollapsingHeader::new(RichText::new("Features").strong())
                .id_salt("features")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for (name, kind, nulls) in &columns {
                        ui.horizontal(|ui: &mut Ui| {
                            let is_output = output.as_deref() == Some(name.as_str());
                            let text = if is_output {
                                RichText::new(format!("{name} (output)")).strong()
                            } else {
                                RichText::new(name).color(state.colors.color_for(name))
                            };
                            ui.label(text);
                            ui.weak(format!("{kind:?}"));
                            if *nulls > 0 {
                                ui.weak(format!("{nulls} missing"));
                            }
                            if ui.small_button("Drop").clicked() {
                                actions.push(Action::RemoveFeature(name.clone()));
                            }
                            if *kind == ColumnKind::Categorical
                                && ui.small_button("One-hot").clicked()
                            {
                                actions.push(Action::OneHot(name.clone()));
                            }
                        });
                    }
                });

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Impute missing").clicked() {
                    actions.push(Action::Impute);
                }
                if ui.button("Scale inputs").clicked() {
                    actions.push(Action::Scale);
                }
            });
            ui.separator();

            // ---- Derive a feature ----
            egui::CollapsingHeader::new(RichText::new("Derive feature").strong())
                .id_salt("derive")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    egui::Grid::new("derive_form")
                        .num_columns(2)
                        .show(ui, |ui: &mut Ui| {
                            ui.label("From");
                            egui::ComboBox::from_id_salt("derive_source")
                                .selected_text(state.derive.source.as_str())
                                .show_ui(ui, |ui: &mut Ui| {
                                    for (name, _, _) in &columns {
                                        ui.selectable_value(
                                            &mut state.derive.source,
                                            name.clone(),
                                            name,
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Mapper");
                            let current = state
                                .mappers
                                .get(state.derive.mapper)
                                .map(|m| m.name().to_string())
                                .unwrap_or_default();
                            egui::ComboBox::from_id_salt("derive_mapper")
                                .selected_text(current)
                                .show_ui(ui, |ui: &mut Ui| {
                                    for (i, mapper) in state.mappers.iter().enumerate() {
                                        ui.selectable_value(&mut state.derive.mapper, i, mapper.name());
                                    }
                                });
                            ui.end_row();

                            ui.label("New name");
                            ui.text_edit_singleline(&mut state.derive.target);
                            ui.end_row();
                        });

                    let ready = !state.derive.source.is_empty()
                        && !state.derive.target.trim().is_empty();
                    if ui.add_enabled(ready, egui::Button::new("Derive")).clicked() {
                        actions.push(Action::Derive {
                            source: state.derive.source.clone(),
                            target: state.derive.target.trim().to_string(),
                            mapper: state.derive.mapper,
                        });
                    }
                });
            ui.separator();

            // ---- Training / validation preview ----
            ui.strong("Split");
            ui.add(
                egui::Slider::new(&mut state.split_config.ratio, 0.0..=1.0).text("training ratio"),
            );
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Preview split").clicked() {
                    actions.push(Action::Split);
                }
                if let Some((train, valid)) = state.split_preview {
                    ui.label(format!("{train} training / {valid} validation rows"));
                }
            });
            ui.separator();

            // ---- Snapshots ----
            ui.strong("Snapshots");
            ui.horizontal(|ui: &mut Ui| {
                ui.text_edit_singleline(&mut state.snapshot_name);
                let name = state.snapshot_name.trim();
                if ui.button("Snapshot").clicked() && !name.is_empty() {
                    actions.push(Action::Snapshot(name.to_string()));
                }
            });
            for name in &snapshots {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(name);
                    if ui.small_button("Use").clicked() {
                        actions.push(Action::UseSnapshot(name.clone()));
                    }
                    if ui.small_button("Delete").clicked() {
                        actions.push(Action::DeleteSnapshot(name.clone()));
                    }
                });
            }
            ui.separator();

            // ---- Log ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong(format!("Log ({})", log_lines.len()));
                if ui
                    .small_button("Replay")
                    .on_hover_text("Reload the initial table and apply the log again")
                    .clicked()
                {
                    actions.push(Action::Replay);
                }
                if ui.small_button("Copy JSON").clicked() {
                    match state.session.log().to_json() {
                        Ok(json) => ui.ctx().copy_text(json),
                        Err(e) => log::warn!("Could not serialize log: {e}"),
                    }
                }
            });
            for (i, line) in log_lines.iter().enumerate() {
                ui.monospace(format!("{:>2}  {line}", i + 1));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ExplorerState, actions: &mut Vec<Action>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    actions.push(Action::Open(path));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Ok(table) = state.session.table() {
            ui.label(format!(
                "{} rows × {} columns, {} transforms",
                table.height(),
                table.width(),
                state.session.log().len()
            ));
        }

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Table, "Table");
        ui.selectable_value(&mut state.tab, Tab::Explore, "Explore");

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Delimited text", &["csv", "tsv", "tab"])
        .add_filter("CSV", &["csv"])
        .pick_file()
}

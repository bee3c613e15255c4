use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use egui_plot::{Line, Plot, PlotPoints, Points};

use dora_eda::plot::grid_shape;
use dora_eda::{FeaturePlot, Table};

use crate::state::{ExplorerState, Tab};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the table preview or the feature plots, depending on the tab.
pub fn central_panel(ui: &mut Ui, state: &ExplorerState) {
    let table = match state.session.table() {
        Ok(table) => table,
        Err(_) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a CSV file to start exploring  (File → Open…)");
            });
            return;
        }
    };

    match state.tab {
        Tab::Table => table_view(ui, table, state.session.output().ok()),
        Tab::Explore => explore_view(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Table preview
// ---------------------------------------------------------------------------

fn table_view(ui: &mut Ui, table: &Table, output: Option<&str>) {
    let columns = table.columns();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(TableColumn::auto().at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            for col in columns {
                header.col(|ui: &mut Ui| {
                    let text = RichText::new(&col.name).strong();
                    if output == Some(col.name.as_str()) {
                        ui.label(text.underline());
                    } else {
                        ui.label(text);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.height(), |mut row| {
                let r = row.index();
                for col in columns {
                    row.col(|ui: &mut Ui| {
                        let value = &col.values[r];
                        if value.is_null() {
                            ui.weak(value.to_string());
                        } else {
                            ui.label(value.to_string());
                        }
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Feature plots
// ---------------------------------------------------------------------------

/// Grid of scatter + fit plots, one per input feature.
fn explore_view(ui: &mut Ui, state: &ExplorerState) {
    let (rows, cols) = grid_shape(state.plots.len());
    if rows == 0 {
        ui.label("Choose an output column to plot the input features against it.");
        return;
    }

    let spacing = ui.spacing().item_spacing;
    let width = ((ui.available_width() - spacing.x * cols as f32) / cols as f32).max(160.0);
    let height = ((ui.available_height() - spacing.y * rows as f32) / rows as f32 - 24.0).max(120.0);

    egui::ScrollArea::both().show(ui, |ui: &mut Ui| {
        egui::Grid::new("explore_grid")
            .num_columns(cols)
            .show(ui, |ui: &mut Ui| {
                for (i, (name, plot)) in state.plots.iter().enumerate() {
                    ui.vertical(|ui: &mut Ui| match plot {
                        Ok(plot) => {
                            feature_plot(ui, plot, state.colors.color_for(name), width, height)
                        }
                        Err(e) => {
                            ui.set_min_size(egui::vec2(width, height));
                            ui.label(RichText::new(format!("{name}: {e}")).color(Color32::RED));
                        }
                    });
                    if (i + 1) % cols == 0 {
                        ui.end_row();
                    }
                }
            });
    });
}

fn feature_plot(ui: &mut Ui, plot: &FeaturePlot, color: Color32, width: f32, height: f32) {
    ui.label(RichText::new(plot.title()).strong());

    let scatter: PlotPoints = plot.points.iter().copied().collect();
    let fit: PlotPoints = plot.fit_line().into_iter().collect();

    let points = Points::new(scatter)
        .name(&plot.feature)
        .color(color)
        .radius(2.5);
    let line = Line::new(fit)
        .name("least squares fit")
        .color(Color32::GRAY)
        .width(1.5);

    Plot::new(format!("feature_plot_{}", plot.feature))
        .width(width)
        .height(height)
        .x_axis_label(plot.feature.as_str())
        .y_axis_label(plot.output.as_str())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(points);
            plot_ui.line(line);
        });
}

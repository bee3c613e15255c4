use eframe::egui;

use crate::state::ExplorerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DoraApp {
    pub state: ExplorerState,
}

impl DoraApp {
    pub fn new(state: ExplorerState) -> Self {
        Self { state }
    }
}

impl eframe::App for DoraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut actions);
        });

        // ---- Left side panel: transforms, snapshots, log ----
        egui::SidePanel::left("session_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut actions);
            });

        // ---- Central panel: table preview / feature plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::central_panel(ui, &self.state);
        });

        for action in actions {
            self.state.perform(action);
        }
    }
}

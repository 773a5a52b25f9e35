use eframe::egui;

use crate::state::SessionState;
use crate::ui::{map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SioutViewerApp {
    pub state: SessionState,
}

impl Default for SioutViewerApp {
    fn default() -> Self {
        Self {
            state: SessionState::default(),
        }
    }
}

impl eframe::App for SioutViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table, pagination, map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Abra um arquivo para visualizar os registros  (Arquivo → Abrir…)");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    table::table_view(ui, &mut self.state);
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        ui.add_space(ui.available_width() / 3.0);
                        table::pagination_controls(ui, &mut self.state);
                    });
                    ui.separator();
                    map::map_view(ui, &self.state);
                });
        });
    }
}

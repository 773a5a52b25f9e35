use eframe::egui::Ui;
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};

use crate::color::StatusCategory;
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Location map (scatter over lon/lat)
// ---------------------------------------------------------------------------

/// Render the filtered records' coordinates, colored by status category.
pub fn map_view(ui: &mut Ui, state: &SessionState) {
    if state.dataset.is_none() {
        return;
    }

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Mapa de Localização");
    });

    if state.markers.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label("Nenhuma coordenada válida encontrada nos dados filtrados.");
        });
        return;
    }

    Plot::new("location_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .height(420.0)
        .show(ui, |plot_ui| {
            // One series per category so the legend groups markers by status
            for category in StatusCategory::ALL {
                let coords: Vec<[f64; 2]> = state
                    .markers
                    .iter()
                    .filter(|m| m.category == category)
                    .map(|m| [m.point.lon, m.point.lat])
                    .collect();
                if coords.is_empty() {
                    continue;
                }
                let points = Points::new(PlotPoints::from(coords))
                    .name(category.label())
                    .color(category.color())
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(4.0);
                plot_ui.points(points);
            }
        });
}

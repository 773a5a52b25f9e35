use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::{default_file_name, export_to_path, ExportFormat};
use crate::data::model::{COL_CODE, FILTER_COLUMNS};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel. Every widget change re-runs the filter pipeline.
pub fn side_panel(ui: &mut Ui, state: &mut SessionState) {
    ui.heading("Filtros");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("Nenhum arquivo carregado.");
        return;
    };

    // Clone what the widgets need so state can be mutated inside the loop.
    let unique = dataset.unique_values.clone();
    let date_bounds = dataset.date_bounds;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut changed = false;

            // ---- Date range (período de cadastro) ----
            if let (Some((min, max)), Some((mut start, mut end))) =
                (date_bounds, state.filters.date_range)
            {
                ui.strong("Período de cadastro");
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("de");
                    if ui
                        .add(DatePickerButton::new(&mut start).id_salt("date_start"))
                        .changed()
                    {
                        changed = true;
                    }
                    ui.label("até");
                    if ui
                        .add(DatePickerButton::new(&mut end).id_salt("date_end"))
                        .changed()
                    {
                        changed = true;
                    }
                });
                if changed {
                    // Keep the pickers inside the observed span and ordered
                    start = start.clamp(min, max);
                    end = end.clamp(start, max);
                    state.filters.date_range = Some((start, end));
                }
                ui.separator();
            }

            // ---- Categorical dropdowns + code search ----
            for col in FILTER_COLUMNS {
                let Some(options) = unique.get(col) else {
                    continue;
                };

                ui.strong(col);
                let selected = if col == COL_CODE {
                    state.filters.code.clone()
                } else {
                    state.filters.categorical.get(col).cloned()
                };
                let selected_text = selected.as_deref().unwrap_or("Todos").to_string();

                egui::ComboBox::from_id_salt(col)
                    .width(ui.available_width())
                    .selected_text(selected_text)
                    .show_ui(ui, |ui: &mut Ui| {
                        if ui
                            .selectable_label(selected.is_none(), "Todos")
                            .clicked()
                        {
                            set_selection(state, col, None);
                            changed = true;
                        }
                        for value in options {
                            let is_selected = selected.as_deref() == Some(value.as_str());
                            if ui.selectable_label(is_selected, value).clicked() {
                                set_selection(state, col, Some(value.clone()));
                                changed = true;
                            }
                        }
                    });
                ui.add_space(6.0);
            }

            ui.separator();
            if ui.button("Limpar filtros").clicked() {
                state.clear_filters();
            }

            if changed {
                state.refilter();
            }
        });
}

fn set_selection(state: &mut SessionState, column: &str, value: Option<String>) {
    if column == COL_CODE {
        state.filters.code = value;
        return;
    }
    match value {
        Some(v) => {
            state.filters.categorical.insert(column.to_string(), v);
        }
        None => {
            state.filters.categorical.remove(column);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut SessionState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.add_enabled_ui(state.dataset.is_some(), |ui: &mut Ui| {
                ui.menu_button("Exportar", |ui: &mut Ui| {
                    for format in ExportFormat::ALL {
                        if ui.button(format.label()).clicked() {
                            export_dialog(state, format);
                            ui.close_menu();
                        }
                    }
                });
            });
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "Mostrando {} registros de um total de {}",
                state.visible_rows.len(),
                ds.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut SessionState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir registros de barragens")
        .add_filter("Arquivos suportados", &["xlsx", "xls", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records with columns {:?}",
                    dataset.len(),
                    dataset.columns
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Erro: {e:#}"));
                state.loading = false;
            }
        }
    }
}

fn export_dialog(state: &mut SessionState, format: ExportFormat) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let filtered = state.has_active_filters();
    let suggested = default_file_name(filtered, chrono::Local::now().naive_local(), format);

    let file = rfd::FileDialog::new()
        .set_title("Exportar dados")
        .set_file_name(&suggested)
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    if let Some(path) = file {
        match export_to_path(&path, format, dataset, &state.visible_rows) {
            Ok(()) => {
                log::info!(
                    "Exported {} rows to {}",
                    state.visible_rows.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Erro ao exportar: {e:#}"));
            }
        }
    }
}

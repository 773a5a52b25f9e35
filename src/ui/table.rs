use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::cell_tint;
use crate::data::model::{COL_STATUS_CADASTRO, COL_STATUS_COMPARACAO, COL_STATUS_MASSA};
use crate::data::page::{visible_pages, PageToken};
use crate::state::SessionState;

/// Status columns whose cells get a background tint.
const TINTED_COLUMNS: [&str; 3] = [COL_STATUS_CADASTRO, COL_STATUS_MASSA, COL_STATUS_COMPARACAO];

// ---------------------------------------------------------------------------
// Paged table
// ---------------------------------------------------------------------------

/// Render the current page of the filtered table.
pub fn table_view(ui: &mut Ui, state: &mut SessionState) {
    let page = state.current_page();
    let Some(dataset) = &state.dataset else {
        return;
    };

    let title = if state.has_active_filters() {
        "Dados Filtrados"
    } else {
        "Tabela Completa"
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(title);
    });

    if state.visible_rows.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label("Nenhum registro encontrado com os filtros selecionados.");
        });
        return;
    }

    let range = page.range();
    ui.vertical_centered(|ui: &mut Ui| {
        ui.small(format!(
            "Exibindo registros {} a {} de {}",
            range.start + 1,
            range.end,
            page.total_rows
        ));
    });

    let slice = &state.visible_rows[range];
    let tinted: Vec<bool> = dataset
        .columns
        .iter()
        .map(|c| TINTED_COLUMNS.contains(&c.as_str()))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(420.0)
        .columns(Column::auto().at_least(90.0), dataset.columns.len())
        .header(22.0, |mut header| {
            for name in &dataset.columns {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for &row in slice {
                body.row(20.0, |mut table_row| {
                    for (col_idx, cell) in dataset.rows[row].cells.iter().enumerate() {
                        table_row.col(|ui| {
                            let value = cell.to_string();
                            let mut text = RichText::new(&value);
                            if tinted[col_idx] {
                                if let Some((bg, fg)) = cell_tint(&value) {
                                    text = text.background_color(bg).color(fg);
                                }
                            }
                            ui.label(text);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Pagination controls
// ---------------------------------------------------------------------------

/// Render `◀ 1 … n-2 n-1 n … last ▶` controls under the table.
pub fn pagination_controls(ui: &mut Ui, state: &mut SessionState) {
    let page = state.current_page();
    if state.dataset.is_none() || state.visible_rows.is_empty() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(page.number > 1, egui::Button::new("◀"))
            .clicked()
        {
            state.requested_page = page.number - 1;
        }

        for token in visible_pages(page.number, page.total_pages) {
            match token {
                PageToken::Ellipsis => {
                    ui.label("…");
                }
                PageToken::Page(n) => {
                    if ui
                        .selectable_label(n == page.number, n.to_string())
                        .clicked()
                    {
                        state.requested_page = n;
                    }
                }
            }
        }

        if ui
            .add_enabled(page.number < page.total_pages, egui::Button::new("▶"))
            .clicked()
        {
            state.requested_page = page.number + 1;
        }
    });
}

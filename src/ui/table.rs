use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::{SortDirection, SortKey};
use crate::data::model::{columns, CleanedRecord};
use crate::format::format_number;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Layout table (central panel, below the charts)
// ---------------------------------------------------------------------------

/// Render the visible rows; clicking a header requests a sort on that column.
pub fn layout_table(ui: &mut Ui, state: &mut AppState) {
    let sort = state.criteria().sort();
    let mut clicked: Option<SortKey> = None;

    {
        let rows: Vec<&CleanedRecord> = state.visible().collect();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(80.0), SortKey::ALL.len())
            .column(Column::remainder())
            .header(22.0, |mut header| {
                for key in SortKey::ALL {
                    header.col(|ui| {
                        let marker = match (sort.key == key, sort.direction) {
                            (true, SortDirection::Ascending) => " ↑",
                            (true, SortDirection::Descending) => " ↓",
                            (false, _) => "",
                        };
                        let label = RichText::new(format!("{}{marker}", key.label())).strong();
                        if ui.button(label).clicked() {
                            clicked = Some(key);
                        }
                    });
                }
                header.col(|ui| {
                    ui.strong("Factors");
                });
            })
            .body(|body| {
                body.rows(20.0, rows.len(), |mut row| {
                    let rec = rows[row.index()];
                    let text = |col: &str| rec.field(col).unwrap_or_default().to_string();

                    row.col(|ui| {
                        ui.label(text(columns::LAYOUT_NAME));
                    });
                    row.col(|ui| {
                        let ty = rec.property_type();
                        ui.label(RichText::new(ty).color(state.colors.color_for(ty)));
                    });
                    row.col(|ui| {
                        ui.label(text(columns::CONFIG));
                    });
                    row.col(|ui| {
                        ui.label(format_number(rec.bua_numeric));
                    });
                    row.col(|ui| {
                        ui.label(format_number(rec.plot_numeric));
                    });
                    row.col(|ui| {
                        ui.label(text(columns::LAUNCH_PRICE));
                    });
                    row.col(|ui| {
                        ui.label(text(columns::BUA_PSF));
                    });
                    row.col(|ui| {
                        ui.label(text(columns::PLOT_PSF));
                    });
                    row.col(|ui| {
                        ui.label(text(columns::FACTORS));
                    });
                });
            });
    }

    if let Some(key) = clicked {
        state.request_sort(key);
    }
}

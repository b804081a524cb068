use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FieldFilter;
use crate::format::{format_millions, format_number};
use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let types = dataset.type_options.clone();
    let configs = dataset.config_options.clone();

    ui.strong("Property type");
    let current = state.criteria().type_filter().clone();
    if let Some(filter) = filter_combo(ui, "type_filter", &current, &types) {
        state.set_type_filter(filter);
    }
    ui.add_space(6.0);

    ui.strong("Configuration");
    let current = state.criteria().config_filter().clone();
    if let Some(filter) = filter_combo(ui, "config_filter", &current, &configs) {
        state.set_config_filter(filter);
    }
    ui.add_space(6.0);

    if ui.small_button("Reset filters").clicked() {
        state.reset_filters();
    }
    ui.separator();

    // ---- Per-type averages (always over the full dataset) ----
    ui.strong("Averages by type");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for agg in state.aggregates() {
                ui.label(
                    RichText::new(&agg.property_type)
                        .strong()
                        .color(state.colors.color_for(&agg.property_type)),
                );
                ui.label(format!(
                    "{} layouts · BUA {} · plot {} · {}",
                    agg.record_count,
                    format_number(agg.average_bua),
                    format_number(Some(agg.average_plot)),
                    format_millions(agg.average_price_millions),
                ));
                ui.add_space(4.0);
            }
        });
}

/// Combo box over `All` plus the given options. Returns the new selection
/// when the user picks one.
fn filter_combo(
    ui: &mut Ui,
    id: &str,
    current: &FieldFilter,
    options: &[String],
) -> Option<FieldFilter> {
    let mut chosen = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == FieldFilter::All, "All")
                .clicked()
            {
                chosen = Some(FieldFilter::All);
            }
            for opt in options {
                let filter = FieldFilter::Only(opt.clone());
                if ui.selectable_label(*current == filter, opt).clicked() {
                    chosen = Some(filter);
                }
            }
        });
    chosen
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.dataset {
            Some(ds) if ds.is_empty() => {
                ui.label("No rows with a Type in this sheet");
            }
            Some(ds) => {
                ui.label(format!(
                    "{} layouts loaded, {} visible",
                    ds.len(),
                    state.visible_len()
                ));
            }
            None => {}
        }

        if let LoadStatus::Failed(msg) = &state.status {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open layout sheet")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

use eframe::egui::{self, Color32, RichText};

use crate::config::ViewerConfig;
use crate::state::{AppState, LoadStatus};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PalmLayoutsApp {
    pub state: AppState,
}

impl PalmLayoutsApp {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut state = AppState::default();
        if let Some(path) = &config.data_path {
            state.load_path(path);
        }
        Self { state }
    }
}

impl eframe::App for PalmLayoutsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts + table ----
        let status = self.state.status.clone();
        egui::CentralPanel::default().show(ctx, |ui| match status {
            LoadStatus::Idle => {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a layout sheet to begin  (File → Open…)");
                });
            }
            LoadStatus::Failed(msg) => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(msg).color(Color32::RED).heading());
                });
            }
            LoadStatus::Ready => {
                ui.columns(3, |cols| {
                    plot::size_chart(&mut cols[0], &self.state);
                    plot::price_chart(&mut cols[1], &self.state);
                    plot::bua_price_scatter(&mut cols[2], &self.state);
                });
                egui::CollapsingHeader::new("Property size ranges")
                    .default_open(false)
                    .show(ui, |ui| plot::size_ranges_chart(ui, &self.state));
                ui.separator();
                table::layout_table(ui, &mut self.state);
            }
        });
    }
}

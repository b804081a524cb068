mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use app::PalmLayoutsApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load()
        .unwrap_or_else(|e| {
            log::warn!("Ignoring viewer config: {e:#}");
            ViewerConfig::default()
        })
        .with_args(std::env::args().skip(1));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Palm Layouts – Property Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(PalmLayoutsApp::new(&config)))),
    )
}

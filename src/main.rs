mod app;
mod cache;
mod color;
mod data;
mod error;
mod settings;
mod state;
mod ui;

use app::JobsDashboardApp;
use eframe::egui;
use settings::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env().unwrap_or_else(|e| {
        log::warn!("Invalid settings ({e}), using defaults");
        DashboardConfig::default()
    });
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Job Postings Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(JobsDashboardApp::new(config)))),
    )
}

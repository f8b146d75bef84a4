mod app;
mod charts;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::EmigrantDashboardApp;
use config::DataPaths;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let paths = DataPaths::resolve(std::env::args().nth(1));
    log::info!("Using data directory {}", paths.dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Philippine Emigration Dashboard (1981–2020)",
        options,
        Box::new(move |cc| Ok(Box::new(EmigrantDashboardApp::new(cc, paths)))),
    )
}

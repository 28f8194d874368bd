mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use eframe::egui;
use ppp_tesis_dashboard::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::warn!("{e}; falling back to default settings");
        DashboardConfig::default()
    });

    // A path on the command line wins over the configured one.
    let initial_file = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.data_file.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard Estadístico PPP y Tesis",
        options,
        Box::new(move |_cc| {
            let mut app = DashboardApp::new(config);
            if let Some(path) = initial_file {
                app.state.load_path(&path);
            }
            Ok(Box::new(app))
        }),
    )
}

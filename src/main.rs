mod app;
mod color;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::DashboardApp;
use county_dashboard::config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::error!("Ignoring {CONFIG_FILE}: {e}");
        DashboardConfig::default()
    });

    // `county-dashboard [DATA_FILE]`
    let initial = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.data_file.clone());

    let mut app = DashboardApp::new(&config);
    if let Some(path) = initial {
        app.state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    let title = app.title.clone();
    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
}

mod app;
mod ui;

use app::StopflowApp;
use eframe::egui;
use rusty_stopflow::config::Settings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings_path = Settings::default_path();
    let settings = Settings::load_or_default(&settings_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Stopflow – Kinetics Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(StopflowApp::new(settings, settings_path)))),
    )
}

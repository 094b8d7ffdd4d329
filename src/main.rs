mod app;
mod color;
mod state;
mod ui;

use app::FreqResponseApp;
use eframe::egui;
use freq_response_viewer::config::ViewerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Frequency Response Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(FreqResponseApp::new(config)))),
    )
}

mod app;
mod color;
mod state;
mod ui;

use app::SkylineApp;
use clap::Parser;
use eframe::egui;
use skyline_atlas::config::DashboardArgs;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let args = DashboardArgs::parse();
    log::debug!("Dataset path: {}", args.data.display());

    // A failed load leaves the window usable; File → Open… can recover.
    let mut state = AppState::default();
    state.load_path(args.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Skyline Atlas – Tallest Structures In the World",
        options,
        Box::new(|_cc| Ok(Box::new(SkylineApp::new(state)))),
    )
}

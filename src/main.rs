//! AirSight - Air Quality CSV Analysis & Interactive Dashboard
//!
//! A Rust application for exploring hourly air-quality station data:
//! cleaning, grouped statistics, and interactive charts.

mod data;
mod stats;
mod charts;
mod gui;

use eframe::egui;
use gui::AirSightApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("AirSight"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "AirSight",
        options,
        Box::new(|cc| Ok(Box::new(AirSightApp::new(cc)))),
    )
}

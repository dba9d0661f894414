use eframe::egui;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::Path;

use crate::common::config::{CONFIG_FILE_NAME, ViewerConfig};
use crate::ui::AppState;

mod analyzer;
mod common;
mod ui;

fn main() -> eframe::Result<()> {
    // Logging setup; RUST_LOG overrides the defaults
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("canlog_viewer"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Starting up");

    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE_NAME));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CAN Log Viewer")
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CAN Log Viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(config, cc.storage)))),
    )
}

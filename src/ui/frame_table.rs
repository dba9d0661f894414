//! # Frame Table - Filtered Frames
//!
//! Renders a resizable bottom panel listing the frames of the current plot
//! selection in log order.
//!
//! A "Copy as log lines" button puts the selected frames on the clipboard in
//! the configured log dialect.
//!
//! The table uses `egui_extras::TableBuilder` for virtualized rendering, so only
//! visible rows are built even for selections with many thousands of frames.

use chrono::{Local, TimeZone};
use eframe::egui;

use crate::analyzer::{FrameRecord, format_line};
use crate::common::config::{ParserConfig, TimestampFormat};
use crate::ui::AppState;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("frame_table")
        .resizable(true)
        .default_height(200.0)
        .show(ctx, |ui| {
            let Some(selection) = &state.selection else {
                ui.label("No frames selected");
                return;
            };
            if selection.frames.is_empty() {
                ui.label(format!("No data for ID 0x{:X}", selection.identifier));
                return;
            }
            if ui.button("Copy as log lines").clicked() {
                ui.ctx().copy_text(frames_as_log_text(&selection.frames, &state.config.parser));
            }
            render_table(ui, &selection.frames, state.config.display.timestamp_format);
        });
}

/// Render the virtualized frame table.
///
/// Columns:
/// - Time: timestamp as logged, or local date/time for epoch logs
/// - ID: hex identifier
/// - DLC: number of data bytes present
/// - Data: bytes in hex, bus order
fn render_table(ui: &mut egui::Ui, frames: &[FrameRecord], timestamp_format: TimestampFormat) {
    use egui_extras::{Column, TableBuilder};

    let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.3;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .auto_shrink([false, false])
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(200.0).at_least(80.0)) // Time
        .column(Column::initial(100.0).at_least(60.0)) // ID
        .column(Column::initial(40.0).at_least(30.0)) // DLC
        .column(Column::remainder()) // Data
        .header(row_height, |mut header| {
            header.col(|ui| {
                ui.strong("Time");
            });
            header.col(|ui| {
                ui.strong("ID");
            });
            header.col(|ui| {
                ui.strong("DLC");
            });
            header.col(|ui| {
                ui.strong("Data");
            });
        })
        .body(|body| {
            body.rows(row_height, frames.len(), |mut row| {
                let frame = &frames[row.index()];
                row.col(|ui| {
                    ui.monospace(format_timestamp(frame.timestamp(), timestamp_format));
                });
                row.col(|ui| {
                    ui.monospace(format!("0x{:X}", frame.identifier()));
                });
                row.col(|ui| {
                    ui.monospace(frame.data_bytes().len().to_string());
                });
                row.col(|ui| {
                    ui.monospace(format_data(frame.data_bytes()));
                });
            });
        });
}

/// Format a timestamp for display. Epoch values that chrono cannot map to a
/// local time fall back to plain seconds.
pub fn format_timestamp(timestamp: f64, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::Seconds => timestamp.to_string(),
        TimestampFormat::Epoch => {
            let secs = timestamp.trunc() as i64;
            let nanos = (timestamp.fract() * 1e9) as u32;
            match Local.timestamp_opt(secs, nanos).single() {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
                None => timestamp.to_string(),
            }
        }
    }
}

/// Frames written back one per line in the configured dialect.
pub fn frames_as_log_text(frames: &[FrameRecord], config: &ParserConfig) -> String {
    frames.iter().map(|f| format_line(f, config)).collect::<Vec<_>>().join("\n")
}

/// Hex bytes separated by spaces.
pub fn format_data(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
}

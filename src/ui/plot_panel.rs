//! # Plot Panel - Byte Values over Time
//!
//! Fills the central area with an `egui_plot` chart of the current selection:
//! one line per byte position, byte value against the logged timestamp.
//! When nothing is selected, or the selected ID has no frames, a centered
//! status message is shown instead.

use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::ui::AppState;

/// Line colors for byte positions 0 through 7.
const BYTE_COLORS: [Color32; 8] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
];

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let selection = match &state.selection {
            Some(selection) if !selection.frames.is_empty() => selection,
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new(state.status.as_str()).size(18.0));
                });
                return;
            }
        };

        ui.heading(format!("CAN Data for ID 0x{:X}", selection.identifier));
        Plot::new(("can_plot", selection.identifier))
            .legend(Legend::default())
            .x_axis_label("Timestamp")
            .y_axis_label("Data")
            .include_y(0.0)
            .include_y(255.0)
            .show(ui, |plot_ui| {
                for (position, points) in selection.series.iter().enumerate() {
                    if points.is_empty() {
                        continue;
                    }
                    let line = Line::new(format!("Byte {}", position), PlotPoints::Borrowed(points))
                        .color(BYTE_COLORS[position]);
                    plot_ui.line(line);
                }
            });
    });
}

//! # Top Panel - File and CAN ID Controls
//!
//! Renders the fixed-height top panel with two columns:
//! - Column 1: log file selection and parse summary for the loaded file
//! - Column 2: CAN ID entry, the Plot button and the status line

use crate::ui::AppState;
use eframe::egui;

/// Render the top panel with file and filter controls.
///
/// # Parameters
///
/// * `ctx` - egui context
/// * `state` - Mutable application state for reading the summary and updating inputs
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_controls").exact_height(110.0).show(ctx, |ui| {
        ui.columns(2, |cols| {
            cols[0].vertical(|ui| {
                render_file_column(ui, state);
            });

            cols[1].vertical(|ui| {
                render_filter_column(ui, state);
            });
        });
    });
}

fn render_file_column(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("CAN Log");
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Select CAN Log File…").clicked() {
            if let Some(path) = state.open_log_file_picker() {
                state.load_file(&path);
            }
        }
        match state.log_file_name() {
            Some(name) => ui.label(egui::RichText::new(name).monospace().strong()),
            None => ui.label("No file loaded"),
        };
    });

    if state.log_path.is_some() {
        let summary = state.parsed.summary;
        ui.horizontal(|ui| {
            ui.label("Lines:");
            ui.label(egui::RichText::new(summary.total_lines.to_string()).strong());
            ui.label("  Frames:");
            ui.label(egui::RichText::new(summary.frames.to_string()).strong());
            ui.label("  Skipped lines:");
            ui.label(egui::RichText::new(summary.skipped.to_string()).strong());
            if summary.dlc_mismatches > 0 {
                ui.label("  DLC mismatches:");
                ui.label(egui::RichText::new(summary.dlc_mismatches.to_string()).strong());
            }
        });
        if let Some(loaded_at) = state.loaded_at {
            ui.label(format!("Loaded at {}", loaded_at.format("%H:%M:%S")));
        }
    }
}

fn render_filter_column(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filter");
    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Enter CAN ID:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.id_input)
                .hint_text("0x100")
                .desired_width(120.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Plot Data").clicked() || submitted {
            state.plot_entered_id();
        }
    });
    ui.label(state.status.as_str());
}

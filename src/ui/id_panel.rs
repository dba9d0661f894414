//! # Identifier Panel
//!
//! Lists every CAN identifier in the loaded log with its frame count. Clicking
//! an entry fills the CAN ID field and plots it.

use crate::ui::AppState;
use eframe::egui;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("identifiers_left").default_width(180.0).show(ctx, |ui| {
        ui.heading("Identifiers");
        ui.separator();

        if state.identifiers.is_empty() {
            ui.label("No frames loaded");
            return;
        }

        let selected_id = state.selection.as_ref().map(|s| s.identifier);
        let mut clicked = None;
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            for &(identifier, count) in &state.identifiers {
                let text = egui::RichText::new(format!("0x{:<8X} {:>7}", identifier, count)).monospace();
                if ui.selectable_label(selected_id == Some(identifier), text).clicked() {
                    clicked = Some(identifier);
                }
            }
        });

        if let Some(identifier) = clicked {
            state.select_identifier(identifier);
        }
    });
}

//! # Application State Management
//!
//! This module implements the central `AppState` struct which holds all UI state
//! and coordinates the rendering of all UI components. It implements the `eframe::App`
//! trait to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Opens the log file picker and loads the chosen file
//! - Parses the CAN ID typed by the user and filters the loaded frames
//! - Keeps the current plot selection (filtered frames and byte series)
//! - Coordinates rendering of all panels (top, identifiers, frame table, plot)
//! - Persists user settings (last directory, last CAN ID) across sessions
//!
//! Loading and filtering run synchronously inside the click handlers. Loading a
//! new file drops the previous frames and any plot built from them.

use chrono::{DateTime, Local};
use eframe::egui;
use egui_plot::PlotPoint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analyzer::{FrameRecord, ParsedLog, byte_series, filter_by_id, identifier_counts, load_log_file, parse_identifier};
use crate::analyzer::types::MAX_DATA_BYTES;
use crate::common::config::ViewerConfig;

/// Frames selected for plotting, all sharing one identifier.
pub struct PlotSelection {
    pub identifier: u32,
    pub frames: Vec<FrameRecord>,
    /// Plot points per byte position, built once and borrowed on every repaint.
    pub series: [Vec<PlotPoint>; MAX_DATA_BYTES],
}

impl PlotSelection {
    fn new(identifier: u32, frames: Vec<FrameRecord>) -> Self {
        let series = byte_series(&frames).map(|points| points.into_iter().map(PlotPoint::from).collect());
        Self { identifier, frames, series }
    }
}

/// Central application state.
pub struct AppState {
    /// Optional alert message to display in a modal dialog.
    pub alert: Option<String>,
    pub config: ViewerConfig,

    /// Path of the currently loaded log, if any.
    pub log_path: Option<PathBuf>,
    /// Frames and counters of the currently loaded log.
    pub parsed: ParsedLog,
    /// Identifiers in the loaded log with their frame counts.
    pub identifiers: Vec<(u32, usize)>,
    /// Local time of the last successful load.
    pub loaded_at: Option<DateTime<Local>>,

    /// CAN ID text as typed by the user.
    pub id_input: String,
    /// Current plot, replaced on every "Plot" action.
    pub selection: Option<PlotSelection>,
    /// One-line status shown under the controls.
    pub status: String,

    /// Last directory used for the log file picker.
    pub last_open_dir: Option<String>,
}

/// Settings persisted across application sessions.
///
/// UI preferences only; loaded frames are never stored.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    last_open_dir: Option<String>,
    last_id_input: Option<String>,
}

impl AppState {
    /// Create a new AppState, loading persisted settings if available.
    ///
    /// # Parameters
    ///
    /// * `config` - Viewer configuration (log dialect and display options)
    /// * `storage` - Optional persistent storage for loading saved settings
    pub fn new(config: ViewerConfig, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();

        Self {
            alert: None,
            config,
            log_path: None,
            parsed: ParsedLog::default(),
            identifiers: Vec::new(),
            loaded_at: None,
            id_input: persisted.last_id_input.unwrap_or_default(),
            selection: None,
            status: "Select a CAN log file to begin.".to_string(),
            last_open_dir: persisted.last_open_dir,
        }
    }

    /// Open a native file picker for selecting a log file.
    /// Returns the selected path or None if cancelled.
    pub fn open_log_file_picker(&mut self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Select CAN Log File")
            .add_filter("Text files", &["txt", "log"])
            .add_filter("All files", &["*"]);
        if let Some(dir) = &self.last_open_dir {
            dialog = dialog.set_directory(dir);
        }
        let file = dialog.pick_file()?;
        if let Some(parent) = file.parent() {
            self.last_open_dir = Some(parent.to_string_lossy().to_string());
        }
        Some(file)
    }

    /// Load a log file, replacing the current frames.
    ///
    /// On failure the previous log stays loaded and an alert is raised.
    pub fn load_file(&mut self, path: &Path) {
        match load_log_file(path, &self.config.parser) {
            Ok(parsed) => {
                self.log_path = Some(path.to_path_buf());
                self.identifiers = identifier_counts(&parsed.records);
                self.parsed = parsed;
                self.loaded_at = Some(Local::now());
                self.selection = None;
                self.status = if self.parsed.records.is_empty() {
                    "The file contains no readable CAN frames.".to_string()
                } else {
                    "Enter a CAN ID and press Plot.".to_string()
                };
            }
            Err(e) => {
                log::error!("{}", e);
                self.alert = Some(e.to_string());
            }
        }
    }

    /// Parse `id_input` and plot the matching frames.
    pub fn plot_entered_id(&mut self) {
        if self.log_path.is_none() {
            self.status = "Select a CAN log file first.".to_string();
            return;
        }
        let input = self.id_input.trim();
        if input.is_empty() {
            self.status = "Enter a CAN ID.".to_string();
            return;
        }
        match parse_identifier(input, self.config.parser.id_base) {
            Some(identifier) => self.plot_identifier(identifier),
            None => {
                self.status = format!("'{}' is not a valid CAN ID.", input);
                self.selection = None;
            }
        }
    }

    /// Select an identifier from the list and plot it.
    pub fn select_identifier(&mut self, identifier: u32) {
        self.id_input = format!("0x{:X}", identifier);
        self.plot_identifier(identifier);
    }

    fn plot_identifier(&mut self, identifier: u32) {
        let frames = filter_by_id(&self.parsed.records, identifier);
        self.status = if frames.is_empty() {
            format!("No data for ID 0x{:X}.", identifier)
        } else {
            format!("{} frames for ID 0x{:X}.", frames.len(), identifier)
        };
        log::debug!("{}", self.status);
        self.selection = Some(PlotSelection::new(identifier, frames));
    }

    /// File name of the loaded log, for display.
    pub fn log_file_name(&self) -> Option<String> {
        self.log_path
            .as_ref()
            .map(|p| p.file_name().map_or_else(|| p.to_string_lossy(), |n| n.to_string_lossy()).to_string())
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            last_open_dir: self.last_open_dir.clone(),
            last_id_input: Some(self.id_input.clone()),
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(alert_msg) = self.alert.clone() {
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(alert_msg);
                        ui.add_space(20.0);

                        if ui.button("OK").clicked() {
                            self.alert = None;
                        }
                        ui.add_space(10.0);
                    });
                });
        }

        // Panels layout: top and bottom (fixed), identifiers on the left, plot fills the rest
        super::top_panel::render(ctx, self);
        super::id_panel::render(ctx, self);
        super::frame_table::render(ctx, self);
        super::plot_panel::render(ctx, self);
    }
}

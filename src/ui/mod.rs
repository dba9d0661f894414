// UI module for the CAN log viewer
//
// This module organizes the UI into separate components:
// - `top_panel`: File selection, parse summary and CAN ID entry
// - `id_panel`: Identifiers present in the loaded log
// - `frame_table`: Frames of the current selection
// - `plot_panel`: Central byte-value plot
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod frame_table;
pub mod id_panel;
pub mod plot_panel;
pub mod top_panel;

pub use app_state::AppState;

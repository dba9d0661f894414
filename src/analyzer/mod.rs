//! Analyzer module for CAN log parsing and frame queries.
//!
//! Provides functionality for:
//! - Loading a text log from disk
//! - Parsing lines into `FrameRecord`s, skipping malformed ones
//! - Filtering by identifier and shaping per-byte plot series
//!
//! The UI calls these directly; there is no background task.

pub mod frames;
pub mod log_loader;
pub mod log_parser;
pub mod types;

pub use frames::{byte_series, filter_by_id, identifier_counts};
pub use log_loader::load_log_file;
pub use log_parser::{format_line, parse_identifier};
pub use types::{FrameRecord, ParsedLog};

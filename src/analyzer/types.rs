//! Type definitions specific to the analyzer module.

use std::fmt;
use std::path::PathBuf;

/// Maximum payload of a classic CAN frame.
pub const MAX_DATA_BYTES: usize = 8;

/// One CAN frame read from a log line.
///
/// Fields are private so a record cannot change after construction, and the
/// payload is stored inline so a record is never longer than eight bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    timestamp: f64,
    identifier: u32,
    data: [u8; MAX_DATA_BYTES],
    len: u8,
}

impl FrameRecord {
    /// Build a record, refusing payloads longer than [`MAX_DATA_BYTES`].
    pub fn new(timestamp: f64, identifier: u32, data_bytes: &[u8]) -> Option<Self> {
        if data_bytes.len() > MAX_DATA_BYTES {
            return None;
        }
        let mut data = [0u8; MAX_DATA_BYTES];
        data[..data_bytes.len()].copy_from_slice(data_bytes);
        Some(Self {
            timestamp,
            identifier,
            data,
            len: data_bytes.len() as u8,
        })
    }

    /// Timestamp in seconds, exactly as written in the log.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn identifier(&self) -> u32 {
        self.identifier
    }

    /// Data bytes in bus order.
    pub fn data_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

/// Writes the record back in the default log column layout:
/// `<timestamp> 0x<ID> <dlc> <bytes...>`.
impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0x{:X} {}", self.timestamp, self.identifier, self.len)?;
        for byte in self.data_bytes() {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}

/// Counters collected while parsing one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Every line seen, including blank ones.
    pub total_lines: usize,
    /// Lines that produced a frame record.
    pub frames: usize,
    /// Malformed lines dropped from the output.
    pub skipped: usize,
    /// Blank and comment lines.
    pub ignored: usize,
    /// Frames whose declared DLC disagreed with the bytes present.
    pub dlc_mismatches: usize,
}

/// Result of parsing a whole log: the frames in line order plus counters.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub records: Vec<FrameRecord>,
    pub summary: ParseSummary,
}

/// Reason a single line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Fewer tokens than the required columns.
    MissingTokens { found: usize, required: usize },
    Timestamp(String),
    Identifier(String),
    Dlc(String),
    DataByte(String),
    /// More than eight data bytes on one line.
    TooManyDataBytes(usize),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::MissingTokens { found, required } => {
                write!(f, "expected at least {} columns, found {}", required, found)
            }
            LineError::Timestamp(token) => write!(f, "invalid timestamp '{}'", token),
            LineError::Identifier(token) => write!(f, "invalid identifier '{}'", token),
            LineError::Dlc(token) => write!(f, "invalid DLC '{}'", token),
            LineError::DataByte(token) => write!(f, "invalid data byte '{}'", token),
            LineError::TooManyDataBytes(count) => {
                write!(f, "{} data bytes exceed the {} byte limit", count, MAX_DATA_BYTES)
            }
        }
    }
}

impl std::error::Error for LineError {}

/// Outcome of a single log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// A parsed frame; `dlc_mismatch` is set when the declared length disagreed.
    Frame { record: FrameRecord, dlc_mismatch: bool },
    /// Blank line or comment.
    Ignored,
    /// Malformed line.
    Skipped(LineError),
}

/// Error type for log loading failures.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    FileAccess { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::FileAccess { path, source } => {
                write!(f, "Failed to read log file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::FileAccess { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejects_more_than_eight_bytes() {
        assert!(FrameRecord::new(0.0, 1, &[0; 8]).is_some());
        assert!(FrameRecord::new(0.0, 1, &[0; 9]).is_none());
    }

    #[test]
    fn record_exposes_only_present_bytes() {
        let record = FrameRecord::new(1.5, 0x7DF, &[0x02, 0x01]).unwrap();
        assert_eq!(record.data_bytes(), &[0x02, 0x01]);
        assert_eq!(record.identifier(), 0x7DF);
        assert_eq!(record.timestamp(), 1.5);

        let empty = FrameRecord::new(2.0, 0x100, &[]).unwrap();
        assert!(empty.data_bytes().is_empty());
    }

    #[test]
    fn record_display_uses_log_columns() {
        let record = FrameRecord::new(0.001, 0x100, &[0x11, 0x0A]).unwrap();
        assert_eq!(record.to_string(), "0.001 0x100 2 11 0A");

        let empty = FrameRecord::new(3.0, 0x18FEF100, &[]).unwrap();
        assert_eq!(empty.to_string(), "3 0x18FEF100 0");
    }

    #[test]
    fn load_error_mentions_path() {
        let err = LoadError::FileAccess {
            path: PathBuf::from("/no/such/file.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let text = err.to_string();
        assert!(text.contains("/no/such/file.txt"));
        assert!(text.contains("not found"));
    }
}

//! File I/O for log loading.
//!
//! A load reads the whole file synchronously, decodes it as UTF-8 (invalid
//! sequences are replaced, so they only spoil the lines they appear on) and
//! hands the text to the parser. Opening or reading the file is the only step
//! that can fail.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::log_parser::parse_log;
use super::types::{LoadError, ParsedLog};
use crate::common::config::ParserConfig;

/// Buffer size for reading log files (8KB).
const BUFFER_SIZE: usize = 8 * 1024;

/// Read and parse a log file.
///
/// # Returns
///
/// `Ok(ParsedLog)` when the file could be read, even if every line was
/// malformed. `Err(LoadError::FileAccess)` if the file cannot be opened or read.
pub fn load_log_file(path: &Path, config: &ParserConfig) -> Result<ParsedLog, LoadError> {
    let text = read_log_text(path)?;
    let parsed = parse_log(&text, config);

    log::info!(
        "Loaded {}: {} frames, {} skipped, {} ignored lines",
        path.display(),
        parsed.summary.frames,
        parsed.summary.skipped,
        parsed.summary.ignored
    );
    if parsed.summary.dlc_mismatches > 0 {
        log::debug!("{} frames had a DLC that disagreed with their data bytes", parsed.summary.dlc_mismatches);
    }

    Ok(parsed)
}

fn read_log_text(path: &Path) -> Result<String, LoadError> {
    let to_error = |source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_error)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut contents = Vec::new();
    reader.read_to_end(&mut contents).map_err(to_error)?;

    Ok(String::from_utf8_lossy(&contents).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_access_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        match load_log_file(&path, &ParserConfig::default()) {
            Err(LoadError::FileAccess { path: failed, source }) => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            Ok(_) => panic!("Expected FileAccess error"),
        }
    }

    #[test]
    fn test_directory_is_access_failure() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_log_file(dir.path(), &ParserConfig::default()).is_err());
    }

    #[test]
    fn test_loads_file_and_skips_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.001 0x100 8 11 22 33 44 55 66 77 88").unwrap();
        writeln!(file, "0.002 garbage 3 11 22").unwrap();
        writeln!(file, "0.003 0x200 1 FF").unwrap();

        let parsed = load_log_file(file.path(), &ParserConfig::default()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.summary.skipped, 1);
        assert_eq!(parsed.records[1].identifier(), 0x200);
    }

    #[test]
    fn test_invalid_utf8_only_affects_its_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0.1 0x1 1 AA\n0.2 \xFF\xFE 1 BB\n0.3 0x3 1 CC\n").unwrap();

        let parsed = load_log_file(file.path(), &ParserConfig::default()).unwrap();
        let ids: Vec<u32> = parsed.records.iter().map(|r| r.identifier()).collect();
        assert_eq!(ids, vec![0x1, 0x3]);
        assert_eq!(parsed.summary.skipped, 1);
    }

    #[test]
    fn test_empty_file_loads_without_frames() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let parsed = load_log_file(file.path(), &ParserConfig::default()).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.summary.total_lines, 0);
    }
}

//! Parse individual log lines into `FrameRecord`s.
//!
//! Supported dialect, one frame per line:
//!
//! ```text
//! <timestamp> <identifier> <dlc> <byte0> ... <byte7>
//! 0.001 0x100 8 11 22 33 44 55 66 77 88
//! 0.250 1792 2 02 01
//! 0.500 18FEF100 3 A1B2C3
//! ```
//!
//! - Columns are whitespace separated unless a single-character delimiter is
//!   configured.
//! - The DLC column can be switched off; when present its value is advisory and
//!   the bytes actually on the line win.
//! - Data bytes are hex, either one token per byte or a single compact token.
//! - Blank lines and lines starting with `#` or `//` are ignored.
//!
//! A malformed line never aborts a load: it becomes [`LineOutcome::Skipped`]
//! and parsing continues with the next line.

use super::types::{FrameRecord, LineError, LineOutcome, MAX_DATA_BYTES, ParsedLog};
use crate::common::config::{Delimiter, IdBase, ParserConfig};

/// Parse a whole log text, keeping only successfully parsed frames.
pub fn parse_log(text: &str, config: &ParserConfig) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    for (index, outcome) in parse_lines(text, config).enumerate() {
        parsed.summary.total_lines += 1;
        match outcome {
            LineOutcome::Frame { record, dlc_mismatch } => {
                if dlc_mismatch {
                    parsed.summary.dlc_mismatches += 1;
                }
                parsed.records.push(record);
            }
            LineOutcome::Ignored => parsed.summary.ignored += 1,
            LineOutcome::Skipped(e) => {
                log::trace!("Skipping line {}: {}", index + 1, e);
                parsed.summary.skipped += 1;
            }
        }
    }
    parsed.summary.frames = parsed.records.len();

    parsed
}

/// Lazily parse each line of `text`, one outcome per line.
pub fn parse_lines<'a>(text: &'a str, config: &'a ParserConfig) -> impl Iterator<Item = LineOutcome> + 'a {
    text.lines().map(move |line| parse_line(line, config))
}

/// Parse a single log line.
pub fn parse_line(line: &str, config: &ParserConfig) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return LineOutcome::Ignored;
    }

    match parse_frame(trimmed, config) {
        Ok((record, dlc_mismatch)) => LineOutcome::Frame { record, dlc_mismatch },
        Err(e) => LineOutcome::Skipped(e),
    }
}

fn parse_frame(line: &str, config: &ParserConfig) -> Result<(FrameRecord, bool), LineError> {
    let tokens = tokenize(line, config.delimiter);
    let required = if config.has_dlc { 3 } else { 2 };
    if tokens.len() < required {
        return Err(LineError::MissingTokens {
            found: tokens.len(),
            required,
        });
    }

    let timestamp = parse_timestamp(tokens[0]).ok_or_else(|| LineError::Timestamp(tokens[0].to_string()))?;
    let identifier =
        parse_identifier(tokens[1], config.id_base).ok_or_else(|| LineError::Identifier(tokens[1].to_string()))?;
    let declared_len = if config.has_dlc {
        let dlc: u8 = tokens[2].parse().map_err(|_| LineError::Dlc(tokens[2].to_string()))?;
        Some(dlc as usize)
    } else {
        None
    };

    let mut buffer = [0u8; MAX_DATA_BYTES];
    let len = parse_data_bytes(&tokens[required..], &mut buffer)?;
    let dlc_mismatch = declared_len.is_some_and(|declared| declared != len);
    if dlc_mismatch {
        log::trace!("DLC {:?} disagrees with {} data bytes for ID 0x{:X}", declared_len, len, identifier);
    }

    let record = FrameRecord::new(timestamp, identifier, &buffer[..len]).ok_or(LineError::TooManyDataBytes(len))?;
    Ok((record, dlc_mismatch))
}

/// Write a record back as one line of the configured dialect.
///
/// The identifier is always written with a `0x` prefix so it reads back the
/// same under either [`IdBase`]. The DLC column is written only when the
/// dialect has one.
pub fn format_line(record: &FrameRecord, config: &ParserConfig) -> String {
    let mut tokens = Vec::with_capacity(3 + MAX_DATA_BYTES);
    tokens.push(record.timestamp().to_string());
    tokens.push(format!("0x{:X}", record.identifier()));
    if config.has_dlc {
        tokens.push(record.data_bytes().len().to_string());
    }
    tokens.extend(record.data_bytes().iter().map(|b| format!("{:02X}", b)));

    match config.delimiter {
        Delimiter::Whitespace => tokens.join(" "),
        Delimiter::Char(c) => tokens.join(&c.to_string()),
    }
}

fn tokenize(line: &str, delimiter: Delimiter) -> Vec<&str> {
    match delimiter {
        Delimiter::Whitespace => line.split_whitespace().collect(),
        Delimiter::Char(c) => line.split(c).map(str::trim).filter(|t| !t.is_empty()).collect(),
    }
}

/// Timestamps must be finite and non-negative.
fn parse_timestamp(token: &str) -> Option<f64> {
    let value: f64 = token.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a CAN identifier token.
///
/// - `0x`/`0X` prefix: hexadecimal.
/// - Any hex letter present: hexadecimal.
/// - Only decimal digits: decimal for [`IdBase::PreferDecimal`], hexadecimal
///   for [`IdBase::PreferHex`].
///
/// The identifier range is not checked against 11 or 29 bits; anything that
/// fits in a `u32` is accepted.
pub fn parse_identifier(token: &str, base: IdBase) -> Option<u32> {
    let token = token.trim();
    if let Some(digits) = strip_hex_prefix(token) {
        return parse_hex(digits);
    }
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let all_decimal = token.chars().all(|c| c.is_ascii_digit());
    if all_decimal && base == IdBase::PreferDecimal {
        token.parse().ok()
    } else {
        u32::from_str_radix(token, 16).ok()
    }
}

fn strip_hex_prefix(token: &str) -> Option<&str> {
    token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"))
}

/// Strict hex: digits only, so `from_str_radix` never sees a sign.
fn parse_hex(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Fill `buffer` with the data bytes and return how many were written.
fn parse_data_bytes(tokens: &[&str], buffer: &mut [u8; MAX_DATA_BYTES]) -> Result<usize, LineError> {
    // Single compact token such as "A1B2C3"
    if let &[token] = tokens {
        let digits = strip_hex_prefix(token).unwrap_or(token);
        if digits.len() > 2 {
            return parse_compact_bytes(token, digits, buffer);
        }
    }

    if tokens.len() > MAX_DATA_BYTES {
        return Err(LineError::TooManyDataBytes(tokens.len()));
    }
    for (slot, token) in buffer.iter_mut().zip(tokens) {
        *slot = parse_byte(token).ok_or_else(|| LineError::DataByte(token.to_string()))?;
    }
    Ok(tokens.len())
}

fn parse_compact_bytes(token: &str, digits: &str, buffer: &mut [u8; MAX_DATA_BYTES]) -> Result<usize, LineError> {
    if digits.len() % 2 != 0 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LineError::DataByte(token.to_string()));
    }
    let count = digits.len() / 2;
    if count > MAX_DATA_BYTES {
        return Err(LineError::TooManyDataBytes(count));
    }
    for (i, slot) in buffer.iter_mut().take(count).enumerate() {
        let pair = &digits[i * 2..i * 2 + 2];
        *slot = u8::from_str_radix(pair, 16).map_err(|_| LineError::DataByte(token.to_string()))?;
    }
    Ok(count)
}

/// One or two hex digits, optional `0x` prefix.
fn parse_byte(token: &str) -> Option<u8> {
    let digits = strip_hex_prefix(token).unwrap_or(token);
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::ParseSummary;

    fn defaults() -> ParserConfig {
        ParserConfig::default()
    }

    fn frame(line: &str) -> FrameRecord {
        match parse_line(line, &defaults()) {
            LineOutcome::Frame { record, .. } => record,
            other => panic!("Expected frame for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_full_frame() {
        let record = frame("0.001 0x100 8 11 22 33 44 55 66 77 88");
        assert_eq!(record.timestamp(), 0.001);
        assert_eq!(record.identifier(), 256);
        assert_eq!(record.data_bytes(), &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
    }

    #[test]
    fn test_unparsable_identifier_is_skipped() {
        let outcome = parse_line("0.002 garbage 3 11 22", &defaults());
        assert_eq!(outcome, LineOutcome::Skipped(LineError::Identifier("garbage".to_string())));
    }

    #[test]
    fn test_identifier_base_detection() {
        assert_eq!(parse_identifier("0x100", IdBase::PreferDecimal), Some(0x100));
        assert_eq!(parse_identifier("0X7df", IdBase::PreferDecimal), Some(0x7DF));
        assert_eq!(parse_identifier("7DF", IdBase::PreferDecimal), Some(0x7DF));
        assert_eq!(parse_identifier("18FEF100", IdBase::PreferDecimal), Some(0x18FE_F100));
        assert_eq!(parse_identifier("100", IdBase::PreferDecimal), Some(100));
        assert_eq!(parse_identifier("100", IdBase::PreferHex), Some(0x100));
        assert_eq!(parse_identifier(" 256 ", IdBase::PreferDecimal), Some(256));
    }

    #[test]
    fn test_identifier_rejects_junk() {
        for token in ["", "0x", "+100", "-1", "0x+1", "12g", "4294967296", "0x100000000"] {
            assert_eq!(parse_identifier(token, IdBase::PreferDecimal), None, "token {:?}", token);
        }
    }

    #[test]
    fn test_identifier_range_not_enforced() {
        // Wider than 29 bits, still fits a u32
        assert_eq!(parse_identifier("0xFFFFFFFF", IdBase::PreferDecimal), Some(u32::MAX));
    }

    #[test]
    fn test_dlc_is_advisory() {
        let outcome = parse_line("1.0 0x200 8 01 02", &defaults());
        match outcome {
            LineOutcome::Frame { record, dlc_mismatch } => {
                assert!(dlc_mismatch);
                assert_eq!(record.data_bytes(), &[0x01, 0x02]);
            }
            other => panic!("Expected frame, got {:?}", other),
        }

        let outcome = parse_line("1.0 0x200 2 01 02", &defaults());
        assert!(matches!(outcome, LineOutcome::Frame { dlc_mismatch: false, .. }));
    }

    #[test]
    fn test_non_numeric_dlc_is_skipped() {
        let outcome = parse_line("1.0 0x200 x 01 02", &defaults());
        assert_eq!(outcome, LineOutcome::Skipped(LineError::Dlc("x".to_string())));
    }

    #[test]
    fn test_zero_data_bytes() {
        let record = frame("2.5 0x7FF 0");
        assert!(record.data_bytes().is_empty());
    }

    #[test]
    fn test_missing_columns() {
        assert_eq!(
            parse_line("0.1 0x100", &defaults()),
            LineOutcome::Skipped(LineError::MissingTokens { found: 2, required: 3 })
        );
    }

    #[test]
    fn test_bad_timestamps() {
        for line in ["abc 0x100 1 00", "-1.0 0x100 1 00", "NaN 0x100 1 00", "inf 0x100 1 00"] {
            assert!(
                matches!(parse_line(line, &defaults()), LineOutcome::Skipped(LineError::Timestamp(_))),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_bad_data_byte_drops_whole_line() {
        assert_eq!(
            parse_line("0.1 0x100 3 11 ZZ 33", &defaults()),
            LineOutcome::Skipped(LineError::DataByte("ZZ".to_string()))
        );
        assert_eq!(
            parse_line("0.1 0x100 2 11 123", &defaults()),
            LineOutcome::Skipped(LineError::DataByte("123".to_string()))
        );
    }

    #[test]
    fn test_more_than_eight_bytes_is_skipped() {
        assert_eq!(
            parse_line("0.1 0x100 9 01 02 03 04 05 06 07 08 09", &defaults()),
            LineOutcome::Skipped(LineError::TooManyDataBytes(9))
        );
        assert_eq!(
            parse_line("0.1 0x100 9 010203040506070809", &defaults()),
            LineOutcome::Skipped(LineError::TooManyDataBytes(9))
        );
    }

    #[test]
    fn test_compact_data_token() {
        let record = frame("0.5 0x200 3 A1B2C3");
        assert_eq!(record.data_bytes(), &[0xA1, 0xB2, 0xC3]);

        let record = frame("0.5 0x200 2 0xBEEF");
        assert_eq!(record.data_bytes(), &[0xBE, 0xEF]);

        assert!(matches!(
            parse_line("0.5 0x200 2 ABC", &defaults()),
            LineOutcome::Skipped(LineError::DataByte(_))
        ));
    }

    #[test]
    fn test_byte_tokens_with_prefix_and_single_digit() {
        let record = frame("0.5 0x200 3 0x0A f 7");
        assert_eq!(record.data_bytes(), &[0x0A, 0x0F, 0x07]);
    }

    #[test]
    fn test_blank_and_comment_lines_are_ignored() {
        assert_eq!(parse_line("", &defaults()), LineOutcome::Ignored);
        assert_eq!(parse_line("   \t", &defaults()), LineOutcome::Ignored);
        assert_eq!(parse_line("# header", &defaults()), LineOutcome::Ignored);
        assert_eq!(parse_line("  // exported by logger", &defaults()), LineOutcome::Ignored);
    }

    #[test]
    fn test_custom_delimiter_without_dlc() {
        let config = ParserConfig {
            delimiter: Delimiter::Char(','),
            has_dlc: false,
            id_base: IdBase::PreferDecimal,
        };
        match parse_line("0.010, 0x123 ,01,02,,03", &config) {
            LineOutcome::Frame { record, dlc_mismatch } => {
                assert!(!dlc_mismatch);
                assert_eq!(record.identifier(), 0x123);
                assert_eq!(record.data_bytes(), &[0x01, 0x02, 0x03]);
            }
            other => panic!("Expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_prefer_hex_policy() {
        let config = ParserConfig {
            id_base: IdBase::PreferHex,
            ..ParserConfig::default()
        };
        match parse_line("0.1 100 1 FF", &config) {
            LineOutcome::Frame { record, .. } => assert_eq!(record.identifier(), 0x100),
            other => panic!("Expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_through_display() {
        let lines = [
            "0.001 0x100 8 11 22 33 44 55 66 77 88",
            "12.75 0x18FEF100 3 00 7F FF",
            "1700000000.125 0x7FF 0",
        ];
        for line in lines {
            let record = frame(line);
            let reparsed = frame(&record.to_string());
            assert_eq!(record, reparsed);
            assert_eq!(format_line(&record, &defaults()), record.to_string());
        }
    }

    #[test]
    fn test_round_trip_in_every_dialect() {
        let dialects = [
            defaults(),
            ParserConfig {
                has_dlc: false,
                ..defaults()
            },
            ParserConfig {
                delimiter: Delimiter::Char(','),
                ..defaults()
            },
            ParserConfig {
                delimiter: Delimiter::Char(';'),
                has_dlc: false,
                ..defaults()
            },
            ParserConfig {
                id_base: IdBase::PreferHex,
                ..defaults()
            },
        ];
        let records = [
            FrameRecord::new(0.1, 0x100, &[0x11, 0x22]).unwrap(),
            FrameRecord::new(0.001, 0x100, &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]).unwrap(),
            FrameRecord::new(12.75, 0x18FE_F100, &[0x00]).unwrap(),
            FrameRecord::new(3.0, 256, &[]).unwrap(),
        ];
        for config in &dialects {
            for record in &records {
                let line = format_line(record, config);
                match parse_line(&line, config) {
                    LineOutcome::Frame { record: reparsed, dlc_mismatch } => {
                        assert_eq!(&reparsed, record, "dialect {:?}, line {:?}", config, line);
                        assert!(!dlc_mismatch, "dialect {:?}, line {:?}", config, line);
                    }
                    other => panic!("dialect {:?}, line {:?}: got {:?}", config, line, other),
                }
            }
        }
    }

    #[test]
    fn test_format_line_layouts() {
        let record = FrameRecord::new(0.1, 0x100, &[0x11, 0x22]).unwrap();
        let no_dlc = ParserConfig {
            has_dlc: false,
            ..defaults()
        };
        assert_eq!(format_line(&record, &no_dlc), "0.1 0x100 11 22");
        let comma = ParserConfig {
            delimiter: Delimiter::Char(','),
            ..defaults()
        };
        assert_eq!(format_line(&record, &comma), "0.1,0x100,2,11,22");
    }

    #[test]
    fn test_parse_log_skips_malformed_and_keeps_order() {
        let text = "\
# timestamp id dlc data
0.003 0x100 1 03
0.002 garbage 3 11 22

0.001 0x101 2 01 02
not a frame at all
0.004 0x100 8 01
0.005 0x100 9 01 02 03 04 05 06 07 08 09
";
        let parsed = parse_log(text, &defaults());
        let timestamps: Vec<f64> = parsed.records.iter().map(|r| r.timestamp()).collect();
        // Out-of-order timestamps are preserved
        assert_eq!(timestamps, vec![0.003, 0.001, 0.004]);
        assert_eq!(
            parsed.summary,
            ParseSummary {
                total_lines: 8,
                frames: 3,
                skipped: 3,
                ignored: 2,
                dlc_mismatches: 1,
            }
        );
    }

    #[test]
    fn test_parse_log_well_formed_count_with_interleaved_garbage() {
        let mut text = String::new();
        let mut expected = Vec::new();
        for i in 0..50u32 {
            let line = format!("{}.5 0x{:X} 2 {:02X} {:02X}", i, 0x100 + i, i, 0xFF - i);
            expected.push(frame(&line));
            text.push_str(&line);
            text.push('\n');
            if i % 3 == 0 {
                text.push_str("0.0 0x100 2 GG HH\n");
            }
        }
        let parsed = parse_log(&text, &defaults());
        assert_eq!(parsed.records, expected);
        assert_eq!(parsed.summary.skipped, 17);
    }

    #[test]
    fn test_every_record_has_at_most_eight_bytes() {
        let text = "0.1 0x1 8 01 02 03 04 05 06 07 08\n0.2 0x2 12 0102030405060708090A0B0C\n0.3 0x3 4 01020304";
        let parsed = parse_log(text, &defaults());
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.records.iter().all(|r| r.data_bytes().len() <= MAX_DATA_BYTES));
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_log("0.1 0x1 1 AA\r\n0.2 0x2 1 BB\r\n", &defaults());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].data_bytes(), &[0xBB]);
    }
}

//! Configuration loading for the log dialect and display options.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "canlog-viewer.toml";

/// How numeric identifiers without a hex marker are read.
///
/// Tokens with a `0x` prefix or hex letters are always hexadecimal; this only
/// decides the all-digit case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdBase {
    /// `100` means 100. Matches logs that print IDs in decimal or with `0x`.
    #[default]
    PreferDecimal,
    /// `100` means 0x100. For dialects that print bare hex IDs.
    PreferHex,
}

/// Column separator of the log dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Delimiter {
    /// Any run of spaces or tabs.
    #[default]
    Whitespace,
    Char(char),
}

impl TryFrom<String> for Delimiter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("whitespace") {
            return Ok(Delimiter::Whitespace);
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_whitespace() => Ok(Delimiter::Whitespace),
            (Some(c), None) => Ok(Delimiter::Char(c)),
            _ => Err(format!("delimiter must be \"whitespace\" or a single character, got {:?}", value)),
        }
    }
}

/// Column layout used by the log parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParserConfig {
    pub delimiter: Delimiter,
    /// Whether the third column holds the declared byte count.
    pub has_dlc: bool,
    pub id_base: IdBase,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Whitespace,
            has_dlc: true,
            id_base: IdBase::PreferDecimal,
        }
    }
}

/// How timestamps are rendered in the frame table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampFormat {
    /// Plain seconds as logged.
    #[default]
    Seconds,
    /// Seconds since the Unix epoch, shown as local date and time.
    Epoch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DisplayConfig {
    pub timestamp_format: TimestampFormat,
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewerConfig {
    pub parser: ParserConfig,
    pub display: DisplayConfig,
}

impl ViewerConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config if the file exists, otherwise fall back to defaults.
    ///
    /// A file that exists but cannot be read or parsed is reported and ignored.
    pub fn load_or_default(config_path: &Path) -> Self {
        if !config_path.exists() {
            log::debug!("No config file at {}, using defaults", config_path.display());
            return Self::default();
        }
        match Self::load(config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}

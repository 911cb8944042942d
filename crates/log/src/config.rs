//! Logging configuration and presets

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogError;

pub(crate) const LEVEL_VAR: &str = "WARDEN_LOG";
const FORMAT_VAR: &str = "WARDEN_LOG_FORMAT";
const TIME_VAR: &str = "WARDEN_LOG_TIME";
const SOURCE_VAR: &str = "WARDEN_LOG_SOURCE";
const COLORS_VAR: &str = "WARDEN_LOG_COLORS";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level filter in `EnvFilter` syntax (e.g. "info", "debug,warden_resource=trace")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Compact single-line output
    Compact,
    /// Structured JSON output
    Json,
}

impl FromStr for Format {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(LogError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Display configuration
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Use ANSI colors
    pub colors: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: cfg!(debug_assertions),
            target: true,
            colors: std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

impl DisplayConfig {
    fn apply_lookup(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let flag = |v: String| v != "0" && v != "false";
        if let Some(v) = lookup(TIME_VAR) {
            self.time = flag(v);
        }
        if let Some(v) = lookup(SOURCE_VAR) {
            self.source = flag(v);
        }
        if let Some(v) = lookup(COLORS_VAR) {
            self.colors = flag(v);
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    ///
    /// `WARDEN_LOG` wins over `RUST_LOG`. An unrecognised
    /// `WARDEN_LOG_FORMAT` falls back to compact output.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_VAR).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup(FORMAT_VAR) {
            config.format = format.parse().unwrap_or(Format::Compact);
        }

        config.display.apply_lookup(&lookup);
        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                ..DisplayConfig::default()
            },
        }
    }

    /// Test configuration (compact, trace level, no colors or timestamps)
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                time: false,
                source: false,
                target: true,
                colors: false,
            },
        }
    }

    /// Override the level filter.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Override the output format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

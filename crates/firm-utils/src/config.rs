//! Configuration management utilities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn,firm_report=info,firm_llm=info";

/// Errors raised while reading configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    /// A log format string was not recognised
    #[error("Unknown log format '{0}' (expected 'pretty' or 'json')")]
    UnknownLogFormat(String),
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnknownLogFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Set the output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Raise verbosity for the workspace crates
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.filter = "info,firm_report=debug,firm_llm=debug".to_string();
        }
        self
    }
}

/// Read a non-empty, trimmed environment variable
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env_var(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(ConfigError::UnknownLogFormat(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.filter.contains("firm_report=info"));

        let verbose = LogConfig::default().verbose(true);
        assert!(verbose.filter.contains("firm_report=debug"));
    }

    #[test]
    fn test_log_format_serde() {
        let json = serde_json::to_string(&LogFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");
    }

    #[test]
    fn test_env_parse() {
        // SAFETY: This is a test that modifies env vars, which is safe in single-threaded test context
        unsafe {
            std::env::set_var("FIRM_UTILS_TEST_NUMBER", "42");
            std::env::set_var("FIRM_UTILS_TEST_BAD", "forty-two");
            std::env::set_var("FIRM_UTILS_TEST_BLANK", "   ");
        }

        assert_eq!(env_parse::<u64>("FIRM_UTILS_TEST_NUMBER"), Ok(Some(42)));
        assert!(env_parse::<u64>("FIRM_UTILS_TEST_BAD").is_err());
        assert_eq!(env_parse::<u64>("FIRM_UTILS_TEST_BLANK"), Ok(None));
        assert_eq!(env_var("FIRM_UTILS_TEST_UNSET_VARIABLE"), None);
    }
}

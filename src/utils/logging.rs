//! Logging configuration and subscriber setup

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;

/// Levels accepted by `--log-level` and the `[logging]` section
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Logging configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Reject levels tracing cannot filter on
    pub fn validate(&self) -> Result<(), DomainError> {
        if LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            Ok(())
        } else {
            Err(DomainError::BadArgs(format!(
                "Invalid log level '{}', expected one of: {}",
                self.level,
                LOG_LEVELS.join(", ")
            )))
        }
    }

    /// `RUST_LOG` wins over the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_lowercase()))
    }
}

/// Install the global subscriber.
///
/// Events go to stderr so the operator transcript on stdout stays clean.
pub fn init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    config.validate()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| DomainError::BadArgs(format!("Failed to initialize logging: {}", e)))?;
    tracing::debug!(
        "Logging initialized at level {} ({:?})",
        config.level,
        config.format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());
        config.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
        config.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(DomainError::BadArgs(_))));
    }

    #[test]
    fn test_format_parses_from_toml_names() {
        let config: LoggingConfig = toml::from_str("level = \"warn\"\nformat = \"json\"").unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "warn");
    }
}

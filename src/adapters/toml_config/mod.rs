// TOML config adapter - Typed settings from files and the environment

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::utils::logging::{LogFormat, LoggingConfig};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "trackmux.toml";

/// Locations of the MKVToolNix programs and the validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub mkvmerge: PathBuf,
    pub mkvpropedit: PathBuf,
    pub mkvextract: PathBuf,
    pub mkvalidator: PathBuf,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            mkvmerge: PathBuf::from("mkvmerge"),
            mkvpropedit: PathBuf::from("mkvpropedit"),
            mkvextract: PathBuf::from("mkvextract"),
            mkvalidator: PathBuf::from("mkvalidator"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemuxSettings {
    /// Shift applied to every subtitle track, in milliseconds
    pub subtitle_delay_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub timeout_secs: u64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Which metadata service backs episode lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataProvider {
    #[default]
    Filename,
    Plex,
}

impl std::str::FromStr for MetadataProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "filename" => Ok(MetadataProvider::Filename),
            "plex" => Ok(MetadataProvider::Plex),
            other => Err(DomainError::BadArgs(format!(
                "Unknown metadata provider '{}', expected 'filename' or 'plex'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub provider: MetadataProvider,
    pub plex_url: String,
    pub plex_token: Option<String>,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            provider: MetadataProvider::Filename,
            plex_url: "http://localhost:32400".to_string(),
            plex_token: None,
        }
    }
}

/// Every tunable of the tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tools: ToolSettings,
    pub remux: RemuxSettings,
    pub validation: ValidationSettings,
    pub metadata: MetadataSettings,
    pub logging: LoggingConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.logging.validate()?;
        if self.metadata.provider == MetadataProvider::Plex
            && self.metadata.plex_token.as_deref().map_or(true, str::is_empty)
        {
            return Err(DomainError::BadArgs(
                "The plex metadata provider needs a token (PLEX_ACCESS_TOKEN or [metadata] plex_token)"
                    .to_string(),
            ));
        }
        if self.validation.timeout_secs == 0 {
            return Err(DomainError::BadArgs(
                "Validation timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::BadArgs(format!("Invalid value for {}: '{}'", key, value)))
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Platform configuration file: `$XDG_CONFIG_HOME`, `~/.config` or `%APPDATA%`
    pub fn platform_config_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .or_else(|| std::env::var_os("APPDATA").map(PathBuf::from))?;
        Some(base.join("trackmux").join("config.toml"))
    }

    /// Candidate files in search order
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE))
                .chain(Self::platform_config_path())
                .collect(),
        }
    }

    /// Parse settings from TOML text; missing keys keep their defaults
    pub fn parse(content: &str) -> Result<Settings, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load the first config file found, or defaults.
    ///
    /// An explicitly requested file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Settings, DomainError> {
        for path in Self::search_paths(explicit) {
            if !path.is_file() {
                debug!("No config file at {}", path.display());
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|e| {
                DomainError::FsFail(format!("Failed to read config file {}: {}", path.display(), e))
            })?;
            info!("Loading configuration from: {}", path.display());
            return Self::parse(&content);
        }

        match explicit {
            Some(path) => Err(DomainError::FsFail(format!(
                "Config file does not exist: {}",
                path.display()
            ))),
            None => Ok(Settings::default()),
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Returns how many variables were applied.
    pub fn apply_env<F>(settings: &mut Settings, lookup: F) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        let mut take = |key: &str| {
            let value = lookup(key).filter(|value| !value.trim().is_empty());
            if value.is_some() {
                debug!("Found environment override: {}", key);
                applied += 1;
            }
            value
        };

        if let Some(level) = take("TRACKMUX_LOG_LEVEL") {
            settings.logging.level = level;
        }
        if let Some(format) = take("TRACKMUX_LOG_FORMAT") {
            settings.logging.format = LogFormat::from_str(&format, true)
                .map_err(|_| DomainError::BadArgs(format!("Invalid value for TRACKMUX_LOG_FORMAT: '{}'", format)))?;
        }
        if let Some(path) = take("TRACKMUX_MKVMERGE") {
            settings.tools.mkvmerge = PathBuf::from(path);
        }
        if let Some(path) = take("TRACKMUX_MKVPROPEDIT") {
            settings.tools.mkvpropedit = PathBuf::from(path);
        }
        if let Some(path) = take("TRACKMUX_MKVEXTRACT") {
            settings.tools.mkvextract = PathBuf::from(path);
        }
        if let Some(path) = take("TRACKMUX_MKVALIDATOR") {
            settings.tools.mkvalidator = PathBuf::from(path);
        }
        if let Some(delay) = take("TRACKMUX_SUBTITLE_DELAY_MS") {
            settings.remux.subtitle_delay_ms = parse_env("TRACKMUX_SUBTITLE_DELAY_MS", &delay)?;
        }
        if let Some(timeout) = take("TRACKMUX_VALIDATION_TIMEOUT") {
            settings.validation.timeout_secs = parse_env("TRACKMUX_VALIDATION_TIMEOUT", &timeout)?;
        }
        if let Some(provider) = take("TRACKMUX_METADATA_PROVIDER") {
            settings.metadata.provider = provider.parse()?;
        }
        if let Some(url) = take("PLEX_SERVER_URL") {
            settings.metadata.plex_url = url;
        }
        if let Some(token) = take("PLEX_ACCESS_TOKEN") {
            settings.metadata.plex_token = Some(token);
        }

        Ok(applied)
    }
}

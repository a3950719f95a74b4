//! Exporter configuration loader - parses exporter.toml
//!
//! Keeps presentation and database settings out of the code. Every field
//! has a default, so the file is optional unless a path is named
//! explicitly.

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "exporter.toml";

/// Environment variable that can point at a configuration file.
pub const CONFIG_ENV_VAR: &str = "EXPORTER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub summary: SummaryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Schema holding the Station / Sensor / SensorType / Measurement tables.
    pub schema: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// chrono format string for the MeasuredAt column.
    pub timestamp_format: String,
    /// Decimal places in the preview table.
    pub preview_decimals: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            preview_decimals: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Count obsolete measurements too.
    pub include_obsolete: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ExporterConfig {
    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ExporterConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.schema.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database.schema",
                message: "must not be empty".to_string(),
            });
        }
        if self.output.timestamp_format.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "output.timestamp_format",
                message: "must not be empty".to_string(),
            });
        }
        // chrono panics on Display for a bad format, so reject it up front.
        let format = &self.output.timestamp_format;
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                key: "output.timestamp_format",
                message: format!("'{}' is not a valid strftime format", format),
            });
        }
        if self.output.preview_decimals > 15 {
            return Err(ConfigError::Invalid {
                key: "output.preview_decimals",
                message: format!("{} is more than 15", self.output.preview_decimals),
            });
        }
        Ok(())
    }
}

/// Loads configuration from an explicit file.
pub fn load_config_from(path: &Path) -> Result<ExporterConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ExporterConfig::from_toml_str(&contents, path)
}

/// Loads configuration from `explicit`, else `$EXPORTER_CONFIG`, else
/// `exporter.toml` in the working directory.
///
/// A named file (argument or environment) must exist. The default file is
/// optional and its absence yields the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ExporterConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return load_config_from(Path::new(&path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        load_config_from(default_path)
    } else {
        Ok(ExporterConfig::default())
    }
}

//! User configuration loaded from `config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const APP_DIR: &str = "zcalc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub display: DisplayConfig,
}

/// Limits the reducer works under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest operand that can be typed.
    pub max_input_len: usize,
    /// Significant digits kept in a result.
    pub result_precision: usize,
    /// Delay before the keypad resets after a division by zero.
    pub error_clear_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_len: 14,
            result_precision: 12,
            error_clear_delay_ms: 1200,
        }
    }
}

/// How frames are turned into display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Numbers longer than this are re-rendered at `trim_precision`.
    pub trim_above: usize,
    pub trim_precision: usize,
    /// Text longer than this renders small.
    pub small_above: usize,
    /// Text longer than this renders tiny.
    pub tiny_above: usize,
    /// Shown in place of the number after a division by zero.
    pub error_text: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            trim_above: 12,
            trim_precision: 9,
            small_above: 9,
            tiny_above: 13,
            error_text: "Error".to_string(),
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/zcalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            debug!("No config directory, using defaults");
            return Ok(Self::default());
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_input_len == 0 {
            return Err(ConfigError::Invalid {
                field: "engine.max_input_len",
                reason: "must be at least 1",
            });
        }
        if self.engine.result_precision == 0 || self.engine.result_precision > 17 {
            return Err(ConfigError::Invalid {
                field: "engine.result_precision",
                reason: "must be between 1 and 17",
            });
        }
        if self.display.trim_precision == 0 || self.display.trim_precision > 17 {
            return Err(ConfigError::Invalid {
                field: "display.trim_precision",
                reason: "must be between 1 and 17",
            });
        }
        Ok(())
    }
}

//! Configuration file handling for asciimate.
//!
//! Loads configuration from `~/.config/asciimate/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::playback::DEFAULT_INTERVAL_MS;

/// Configuration file structure for asciimate.
/// Loaded from ~/.config/asciimate/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub effect: EffectConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub black_as_space: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            black_as_space: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EffectConfig {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            kind: None,
            intensity: default_intensity(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

fn default_width() -> u32 {
    80
}

fn default_intensity() -> u8 {
    50
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist; without one, the default path is tried
    /// and a missing file falls back to defaults. A file that exists but
    /// cannot be parsed is always an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::read(path)
            }
            None => {
                let path = default_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    NotFound {
        path: PathBuf,
    },
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound { path } => {
                write!(f, "Config file '{}' does not exist", path.display())
            }
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NotFound { .. } => None,
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("asciimate")
        .join("config.toml")
}

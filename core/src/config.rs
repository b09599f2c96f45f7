//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for platform settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::InputConfig;

/// File name inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Platform configuration.
///
/// Contains all user-configurable settings organized into sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Window and presentation settings
    #[serde(default)]
    pub video: VideoConfig,
    /// Audio device settings
    #[serde(default)]
    pub audio: AudioConfig,
    /// Gamepad thresholds
    #[serde(default)]
    pub input: InputConfig,
    /// Main loop pacing
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Window and presentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Window title (default: "tachyon")
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial client width in logical pixels (default: 1280)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial client height in logical pixels (default: 720)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Whether to enable vertical sync (default: true)
    #[serde(default = "default_true")]
    pub vsync: bool,
}

/// Audio device configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Open an output device at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requested sample rate. The device default is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Requested channel count. The device default is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
}

/// Frame pacing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Initial sleep between the early and late pull, in ms (default: 15.0)
    #[serde(default = "default_scan_out_wait_ms")]
    pub scan_out_wait_ms: f64,
    /// Seconds between frame timing summaries in the log, 0 to disable (default: 5)
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_title() -> String {
    "tachyon".to_string()
}
fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_scan_out_wait_ms() -> f64 {
    15.0
}
fn default_stats_log_interval_secs() -> u64 {
    5
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            vsync: default_true(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            sample_rate: None,
            channels: None,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            scan_out_wait_ms: default_scan_out_wait_ms(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

/// Error reading or writing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Tachyon\config`
/// On macOS: `~/Library/Application Support/io.tachyon.Tachyon`
/// On Linux: `~/.config/tachyon`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.tachyon", "", "Tachyon")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the platform config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}. Using default configuration.", e);
            Config::default()
        }
    }
}

/// Loads a configuration file. Missing sections and keys take their defaults.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to the platform config directory.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir.join(CONFIG_FILE_NAME))
}

/// Writes `config` as pretty TOML, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(io_err)
}

//! Configuration file handling.
//!
//! Lives at `<config dir>/termsite/config.toml`. A missing file means
//! defaults; missing fields take their default values.

mod migrate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::HOME_PAGE;
use crate::print::RevealTiming;
use crate::session::{SessionOptions, DEFAULT_CONTAINER_ID};

pub use migrate::{migrate_config, MigrateResult};

/// Errors that can occur while loading, saving or migrating config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to edit config: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Milliseconds between two typed characters
    pub print_speed_ms: u64,
    /// Number of bands an image is revealed in
    pub image_bands: usize,
    /// Milliseconds between two image bands
    pub band_delay_ms: u64,
    /// Chance that a band stalls before painting
    pub stall_probability: f64,
    pub stall_delay_ms: u64,
    /// Fixed seed for stalls; random when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let timing = RevealTiming::default();
        Self {
            print_speed_ms: 5,
            image_bands: timing.bands,
            band_delay_ms: timing.band_delay.as_millis() as u64,
            stall_probability: timing.stall_probability,
            stall_delay_ms: timing.stall_delay.as_millis() as u64,
            seed: None,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Element id output is printed into
    pub container_id: String,
    /// Page shown at startup
    pub home_page: String,
    /// Color theme: green, amber or ocean
    pub theme: String,
    /// Occasional screen flicker
    pub crt_effect: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            home_page: HOME_PAGE.to_string(),
            theme: "green".to_string(),
            crt_effect: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("termsite").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Reject values the animations cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.playback;
        if !(0.0..1.0).contains(&p.stall_probability) {
            return Err(ConfigError::Invalid {
                field: "playback.stall_probability",
                reason: format!("{} is outside [0, 1)", p.stall_probability),
            });
        }
        if p.image_bands == 0 {
            return Err(ConfigError::Invalid {
                field: "playback.image_bands",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.display.container_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "display.container_id",
                reason: "must not be empty".to_string(),
            });
        }
        if self.display.home_page.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "display.home_page",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Session settings derived from this config.
    pub fn session_options(&self) -> SessionOptions {
        let p = &self.playback;
        SessionOptions {
            container_id: self.display.container_id.clone(),
            home_page: self.display.home_page.clone(),
            print_interval: Duration::from_millis(p.print_speed_ms),
            reveal: RevealTiming {
                bands: p.image_bands,
                band_delay: Duration::from_millis(p.band_delay_ms),
                stall_probability: p.stall_probability,
                stall_delay: Duration::from_millis(p.stall_delay_ms),
            },
            seed: p.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_session_defaults() {
        assert_eq!(Config::default().session_options(), SessionOptions::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = Config::from_toml("[playback]\nprint_speed_ms = 20\n").unwrap();
        assert_eq!(config.playback.print_speed_ms, 20);
        assert_eq!(config.playback.image_bands, 50);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.display.theme = "amber".to_string();
        config.playback.seed = Some(7);

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn rejects_out_of_range_stall_probability() {
        let err = Config::from_toml("[playback]\nstall_probability = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("playback.stall_probability"), "{}", err);
    }

    #[test]
    fn rejects_zero_bands() {
        let err = Config::from_toml("[playback]\nimage_bands = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "playback.image_bands", .. }));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Config::from_toml("playback = ["), Err(ConfigError::Parse(_))));
    }
}

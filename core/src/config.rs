//! Harness configuration (TOML)
//!
//! Every field has a default, so an empty document is a valid config and any
//! section can be given partially.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_FLUSH_RATE_HZ;
use crate::input::KeyBinding;

/// Errors from loading or validating a [`HarnessConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// `tracing` filter directive used by hosts that install a subscriber
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Audio queue settings
    #[serde(default)]
    pub audio: AudioConfig,
    /// Frame loop settings
    #[serde(default)]
    pub driver: DriverConfig,
    /// Keyboard settings
    #[serde(default)]
    pub input: InputConfig,
}

/// Audio queue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Minimum playback unit is `1 / flush_rate_hz` seconds (default: 120)
    #[serde(default = "default_flush_rate")]
    pub flush_rate_hz: u32,
    /// Drop pending samples when a cartridge is swapped (default: false)
    #[serde(default)]
    pub discard_on_cart_swap: bool,
}

/// Frame driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Engine time units per host millisecond (default: 1000, i.e. µs)
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Longest frame delta passed through, in ms (default: 100)
    #[serde(default = "default_max_delta_ms")]
    pub max_delta_ms: f64,
    /// Extra one-unit steps allowed per refresh after the audio device ran
    /// dry (default: 0, disabled)
    #[serde(default)]
    pub max_catchup_steps: u32,
}

/// Keyboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InputConfig {
    /// Key identifier to button table
    #[serde(default)]
    pub bindings: KeyBinding,
}

fn default_log_filter() -> String {
    "info".to_string()
}
fn default_flush_rate() -> u32 {
    DEFAULT_FLUSH_RATE_HZ
}
fn default_time_scale() -> f64 {
    1000.0
}
fn default_max_delta_ms() -> f64 {
    100.0
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            audio: AudioConfig::default(),
            driver: DriverConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            flush_rate_hz: default_flush_rate(),
            discard_on_cart_swap: false,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            max_delta_ms: default_max_delta_ms(),
            max_catchup_steps: 0,
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Reject values the harness cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.flush_rate_hz == 0 {
            return Err(ConfigError::Invalid(
                "audio.flush_rate_hz must be greater than 0".into(),
            ));
        }
        if !(self.driver.time_scale.is_finite() && self.driver.time_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "driver.time_scale must be positive, got {}",
                self.driver.time_scale
            )));
        }
        if !(self.driver.max_delta_ms.is_finite() && self.driver.max_delta_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "driver.max_delta_ms must be positive, got {}",
                self.driver.max_delta_ms
            )));
        }
        if self.input.bindings.is_empty() {
            tracing::warn!("no key bindings configured; keyboard input is disabled");
        }
        Ok(())
    }
}

//! Configuration for the host platform and session.
//!
//! This module defines the structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline values for pacing, logging and polling.
//! 2. **Structures:** Hierarchical config for logging, clock, memory and session.
//! 3. **Loading:** JSON parsing from strings or files, followed by validation.
//!
//! Every section and field is optional in JSON; missing values take their defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::HalError;
use crate::hal::{LevelMask, LogLevel};

/// Default configuration constants.
mod defaults {
    use crate::common::constants::DEFAULT_POLL_INTERVAL;

    /// Emulated time runs at wall-clock speed.
    pub const SPEED: f64 = 1.0;

    /// `sleep_until` blocks so the core runs in real time.
    pub const PACING: bool = true;

    /// Steps between `poll_input` calls.
    pub const POLL_INTERVAL: u32 = DEFAULT_POLL_INTERVAL;
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use tamasim_core::config::Config;
/// use tamasim_core::hal::LogLevel;
///
/// let json = r#"{
///     "log": { "levels": ["error", "info", "int"] },
///     "clock": { "speed": 2.0, "pacing": false },
///     "memory": { "budget_bytes": 4096 },
///     "session": { "poll_interval": 64, "max_steps": 1000 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.log.mask().contains(LogLevel::Interrupt));
/// assert!(!config.clock.pacing);
/// assert_eq!(config.memory.budget_bytes, Some(4096));
/// assert_eq!(config.session.max_steps, Some(1000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Guest log filtering
    pub log: LogConfig,
    /// Timestamp source and pacing
    pub clock: ClockConfig,
    /// Host allocator limits
    pub memory: MemoryConfig,
    /// Run loop parameters
    pub session: SessionConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// `HalError::ConfigParse` for malformed JSON, `HalError::InvalidConfig` for values
    /// that parse but cannot be used.
    pub fn from_json(json: &str) -> Result<Self, HalError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// `HalError::Io` if the file cannot be read, otherwise as [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HalError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks values that serde cannot constrain.
    ///
    /// # Errors
    ///
    /// `HalError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), HalError> {
        if !self.clock.speed.is_finite() || self.clock.speed <= 0.0 {
            return Err(HalError::InvalidConfig(format!(
                "clock.speed must be a positive finite number, got {}",
                self.clock.speed
            )));
        }
        if self.session.poll_interval == 0 {
            return Err(HalError::InvalidConfig(
                "session.poll_interval must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Guest log filtering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Levels the `is_log_enabled` slot reports as enabled.
    pub levels: Vec<LogLevel>,
}

impl LogConfig {
    /// Enabled levels as a bitmask.
    pub fn mask(&self) -> LevelMask {
        self.levels.iter().copied().collect()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            levels: vec![LogLevel::Error],
        }
    }
}

/// Timestamp source and pacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    /// Emulated microseconds per host microsecond.
    pub speed: f64,
    /// Whether `sleep_until` actually blocks.
    pub pacing: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            speed: defaults::SPEED,
            pacing: defaults::PACING,
        }
    }
}

/// Host allocator limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Maximum live bytes handed out by `allocate`; unlimited if not set.
    pub budget_bytes: Option<usize>,
}

/// Run loop parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Core steps between `poll_input` calls.
    pub poll_interval: u32,
    /// Stop after this many steps; unlimited if not set.
    pub max_steps: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: defaults::POLL_INTERVAL,
            max_steps: None,
        }
    }
}

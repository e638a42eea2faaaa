//! Settings file for master-mind.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_mastermind::GameTiming;
use tracing::{debug, info, instrument};

/// Pacing and key bindings loaded from TOML.
///
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Entry window per digit, in milliseconds.
    #[serde(default = "default_entry_timeout_ms")]
    entry_timeout_ms: u64,

    /// Button polling interval, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// On and off phase of a blink, in milliseconds.
    #[serde(default = "default_blink_hold_ms")]
    blink_hold_ms: u64,

    /// Pause before a digit is echoed, in milliseconds.
    #[serde(default = "default_acknowledge_pause_ms")]
    acknowledge_pause_ms: u64,

    /// Pause before the end-of-input signal, in milliseconds.
    #[serde(default = "default_end_of_input_pause_ms")]
    end_of_input_pause_ms: u64,

    /// Pause between feedback groups, in milliseconds.
    #[serde(default = "default_feedback_gap_ms")]
    feedback_gap_ms: u64,

    /// Key that acts as the button.
    #[serde(default = "default_button_key")]
    button_key: char,
}

fn default_entry_timeout_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    1
}

fn default_blink_hold_ms() -> u64 {
    200
}

fn default_acknowledge_pause_ms() -> u64 {
    1000
}

fn default_end_of_input_pause_ms() -> u64 {
    2000
}

fn default_feedback_gap_ms() -> u64 {
    1000
}

fn default_button_key() -> char {
    ' '
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entry_timeout_ms: default_entry_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            blink_hold_ms: default_blink_hold_ms(),
            acknowledge_pause_ms: default_acknowledge_pause_ms(),
            end_of_input_pause_ms: default_end_of_input_pause_ms(),
            feedback_gap_ms: default_feedback_gap_ms(),
            button_key: default_button_key(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;

        info!(button_key = ?settings.button_key, "Settings loaded successfully");
        Ok(settings)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Converts the millisecond fields into a [`GameTiming`].
    pub fn timing(&self) -> GameTiming {
        GameTiming::new()
            .with_entry_timeout(Duration::from_millis(self.entry_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_blink_hold(Duration::from_millis(self.blink_hold_ms))
            .with_acknowledge_pause(Duration::from_millis(self.acknowledge_pause_ms))
            .with_end_of_input_pause(Duration::from_millis(self.end_of_input_pause_ms))
            .with_feedback_gap(Duration::from_millis(self.feedback_gap_ms))
    }
}

/// Settings file error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_timing_defaults() {
        assert_eq!(Settings::default().timing(), GameTiming::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str("blink_hold_ms = 50\nbutton_key = 'b'").unwrap();
        assert_eq!(*settings.blink_hold_ms(), 50);
        assert_eq!(*settings.button_key(), 'b');
        assert_eq!(*settings.entry_timeout_ms(), 3000);
        assert_eq!(
            *settings.timing().blink_hold(),
            Duration::from_millis(50)
        );
    }
}

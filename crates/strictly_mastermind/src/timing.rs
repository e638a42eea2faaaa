//! Durations of the entry and signalling protocol.

use derive_getters::Getters;
use derive_setters::Setters;
use std::time::Duration;

/// All timing knobs of a game.
///
/// Defaults reproduce the reference pacing: a 3 s entry window, 200 ms
/// blink phases and one-second pauses between feedback groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GameTiming {
    /// Entry window for one digit, counted from its first pulse.
    entry_timeout: Duration,
    /// Sleep between two button polls.
    poll_interval: Duration,
    /// Time a lamp stays on, and then off, during one blink.
    blink_hold: Duration,
    /// Pause between reading a digit and echoing it.
    acknowledge_pause: Duration,
    /// Pause between the last echo and the end-of-input signal.
    end_of_input_pause: Duration,
    /// Pause between two feedback groups.
    feedback_gap: Duration,
}

impl GameTiming {
    /// Creates the reference timing.
    pub fn new() -> Self {
        Self {
            entry_timeout: Duration::from_secs(3),
            poll_interval: Duration::from_millis(1),
            blink_hold: Duration::from_millis(200),
            acknowledge_pause: Duration::from_secs(1),
            end_of_input_pause: Duration::from_secs(2),
            feedback_gap: Duration::from_secs(1),
        }
    }
}

impl Default for GameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timing = GameTiming::default();
        assert_eq!(*timing.entry_timeout(), Duration::from_secs(3));
        assert_eq!(*timing.blink_hold(), Duration::from_millis(200));
    }

    #[test]
    fn test_setters_override_single_field() {
        let timing = GameTiming::new().with_entry_timeout(Duration::from_millis(500));
        assert_eq!(*timing.entry_timeout(), Duration::from_millis(500));
        assert_eq!(*timing.feedback_gap(), Duration::from_secs(1));
    }
}

//! Hardware capabilities consumed by the game.
//!
//! The game never touches pins or registers. It reads a button through
//! [`PulseInput`], drives two lamps through [`SignalOutput`] and measures
//! time through [`Clock`]. Any backend (GPIO, terminal, simulation) that
//! implements these traits can run the full protocol.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::instrument;

/// One of the two output lamps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Lamp {
    /// Data lamp (green): echoes digits and blinks match counts.
    Primary,
    /// Control lamp (red): acknowledgements, separators and retries.
    Secondary,
}

impl Lamp {
    /// Conventional colour of the lamp.
    pub fn colour(self) -> &'static str {
        match self {
            Lamp::Primary => "green",
            Lamp::Secondary => "red",
        }
    }
}

/// A button, sampled at the caller's cadence.
pub trait PulseInput {
    /// Returns true while the button is pressed.
    ///
    /// # Errors
    ///
    /// A failed read is fatal to the game.
    fn poll(&mut self) -> Result<bool, ChannelError>;

    /// Drops any presses recorded while nobody was polling.
    ///
    /// Called at the start of every digit read. A plain level input has
    /// nothing queued, so the default does nothing.
    ///
    /// # Errors
    ///
    /// A failed read is fatal to the game.
    fn discard_pending(&mut self) -> Result<(), ChannelError> {
        Ok(())
    }
}

/// Two independently switchable lamps.
pub trait SignalOutput {
    /// Switches `lamp` on or off.
    ///
    /// # Errors
    ///
    /// A failed write is fatal to the game.
    fn set_active(&mut self, lamp: Lamp, active: bool) -> Result<(), ChannelError>;
}

/// Monotonic time source with the ability to wait.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

impl<T: PulseInput + ?Sized> PulseInput for &mut T {
    fn poll(&mut self) -> Result<bool, ChannelError> {
        (**self).poll()
    }

    fn discard_pending(&mut self) -> Result<(), ChannelError> {
        (**self).discard_pending()
    }
}

impl<T: PulseInput + ?Sized> PulseInput for Box<T> {
    fn poll(&mut self) -> Result<bool, ChannelError> {
        (**self).poll()
    }

    fn discard_pending(&mut self) -> Result<(), ChannelError> {
        (**self).discard_pending()
    }
}

impl<T: SignalOutput + ?Sized> SignalOutput for &mut T {
    fn set_active(&mut self, lamp: Lamp, active: bool) -> Result<(), ChannelError> {
        (**self).set_active(lamp, active)
    }
}

impl<T: SignalOutput + ?Sized> SignalOutput for Box<T> {
    fn set_active(&mut self, lamp: Lamp, active: bool) -> Result<(), ChannelError> {
        (**self).set_active(lamp, active)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Real time, measured with [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Failure of a button or lamp backend.
#[derive(Debug, Clone, Display, Error)]
#[display("Channel error: {} at {}:{}", message, file, line)]
pub struct ChannelError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ChannelError {
    /// Creates a new channel error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ChannelError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

//! Score feedback as lamp blinks.
//!
//! The observer reads a score as three groups: green blinks for exact
//! matches, one red blink as a separator, green blinks for approximate
//! matches. The order is part of the protocol.

use super::channel::{ChannelError, Clock, Lamp, SignalOutput};
use super::timing::GameTiming;
use super::types::Score;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Blink `lamp` `count` times. A count of zero produces no pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputInstruction {
    /// Lamp to blink.
    pub lamp: Lamp,
    /// Number of on/off cycles.
    pub count: u8,
}

impl OutputInstruction {
    /// Creates a blink instruction.
    pub fn blink(lamp: Lamp, count: u8) -> Self {
        Self { lamp, count }
    }
}

impl std::fmt::Display for OutputInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.lamp.colour(), self.count)
    }
}

/// Encodes a score as exact, separator, approximate.
#[instrument]
pub fn encode(score: &Score) -> [OutputInstruction; 3] {
    [
        OutputInstruction::blink(Lamp::Primary, score.exact()),
        OutputInstruction::blink(Lamp::Secondary, 1),
        OutputInstruction::blink(Lamp::Primary, score.approximate()),
    ]
}

/// Drives lamps with the protocol's hold times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signaller {
    hold: Duration,
    gap: Duration,
}

impl Signaller {
    /// Creates a signaller with a blink phase of `hold` and `gap` between groups.
    pub fn new(hold: Duration, gap: Duration) -> Self {
        Self { hold, gap }
    }

    /// Creates a signaller from the game timing.
    pub fn from_timing(timing: &GameTiming) -> Self {
        Self::new(*timing.blink_hold(), *timing.feedback_gap())
    }

    /// Blinks `lamp` `count` times: on, hold, off, hold.
    ///
    /// # Errors
    ///
    /// Propagates the first failed lamp write.
    #[instrument(skip(self, output, clock))]
    pub fn blink<O, C>(
        &self,
        output: &mut O,
        clock: &C,
        lamp: Lamp,
        count: u8,
    ) -> Result<(), ChannelError>
    where
        O: SignalOutput + ?Sized,
        C: Clock + ?Sized,
    {
        for _ in 0..count {
            output.set_active(lamp, true)?;
            clock.sleep(self.hold);
            output.set_active(lamp, false)?;
            clock.sleep(self.hold);
        }
        Ok(())
    }

    /// Runs instructions in order, pausing for the gap after each one.
    ///
    /// # Errors
    ///
    /// Propagates the first failed lamp write.
    #[instrument(skip(self, output, clock))]
    pub fn emit<O, C>(
        &self,
        output: &mut O,
        clock: &C,
        instructions: &[OutputInstruction],
    ) -> Result<(), ChannelError>
    where
        O: SignalOutput + ?Sized,
        C: Clock + ?Sized,
    {
        for instruction in instructions {
            debug!(%instruction, "Signalling");
            self.blink(output, clock, instruction.lamp, instruction.count)?;
            clock.sleep(self.gap);
        }
        Ok(())
    }

    /// Holds `steady` on while `lamp` blinks `count` times.
    ///
    /// # Errors
    ///
    /// Propagates the first failed lamp write.
    #[instrument(skip(self, output, clock))]
    pub fn blink_under<O, C>(
        &self,
        output: &mut O,
        clock: &C,
        steady: Lamp,
        lamp: Lamp,
        count: u8,
    ) -> Result<(), ChannelError>
    where
        O: SignalOutput + ?Sized,
        C: Clock + ?Sized,
    {
        output.set_active(steady, true)?;
        self.blink(output, clock, lamp, count)?;
        output.set_active(steady, false)
    }
}

//! Simulated hardware for deterministic tests and demos.
//!
//! [`SimulatedClock`] only moves when someone sleeps on it, so a whole game
//! of several minutes runs instantly. [`ScriptedButton`] reads that clock to
//! decide whether the button is down, and [`RecordingLamps`] keeps every lamp
//! transition for later inspection.

use super::channel::{ChannelError, Clock, Lamp, PulseInput, SignalOutput};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// A clock advanced only by [`Clock::sleep`]. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now: Rc<Cell<Duration>>,
}

impl SimulatedClock {
    /// Creates a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward without anyone sleeping.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// A button pressed during fixed intervals of simulated time.
///
/// Each press is a half-open interval `[down, up)`.
#[derive(Debug, Clone)]
pub struct ScriptedButton {
    clock: SimulatedClock,
    presses: Vec<(Duration, Duration)>,
}

impl ScriptedButton {
    /// Creates a button that follows `presses` on `clock`.
    pub fn new(clock: SimulatedClock, presses: Vec<(Duration, Duration)>) -> Self {
        Self { clock, presses }
    }

    /// Builds a script that enters `digits` one after another.
    ///
    /// Entry starts at `start`. Each press lasts `press` and is followed by
    /// an equal release; digits are separated by `digit_gap` of silence,
    /// which must exceed the entry window plus any pauses the caller makes
    /// between digits.
    pub fn typing(
        clock: SimulatedClock,
        start: Duration,
        press: Duration,
        digit_gap: Duration,
        digits: &[u32],
    ) -> Self {
        let mut presses = Vec::new();
        let mut at = start;
        for &digit in digits {
            for _ in 0..digit {
                presses.push((at, at + press));
                at += press * 2;
            }
            at += digit_gap;
        }
        Self::new(clock, presses)
    }

}

impl PulseInput for ScriptedButton {
    fn poll(&mut self) -> Result<bool, ChannelError> {
        let now = self.clock.now();
        Ok(self
            .presses
            .iter()
            .any(|&(down, up)| down <= now && now < up))
    }
}

/// Lamps that remember every transition.
#[derive(Debug, Clone, Default)]
pub struct RecordingLamps {
    transitions: Vec<(Lamp, bool)>,
    lit: [bool; 2],
}

impl RecordingLamps {
    /// Creates lamps that are both off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `set_active` call, in order.
    pub fn transitions(&self) -> &[(Lamp, bool)] {
        &self.transitions
    }

    /// Whether `lamp` is currently on.
    pub fn is_lit(&self, lamp: Lamp) -> bool {
        self.lit[Self::slot(lamp)]
    }

    /// Collapses the history into runs of switch-ons per lamp.
    ///
    /// `[(Secondary, 1), (Primary, 3)]` means the red lamp came on once,
    /// then the green lamp came on three times. Adjacent runs on the same
    /// lamp merge, so `blink(Primary, 0)` leaves no trace.
    pub fn blinks(&self) -> Vec<(Lamp, u32)> {
        let mut runs: Vec<(Lamp, u32)> = Vec::new();
        for &(lamp, active) in &self.transitions {
            if !active {
                continue;
            }
            match runs.last_mut() {
                Some((last, count)) if *last == lamp => *count += 1,
                _ => runs.push((lamp, 1)),
            }
        }
        runs
    }

    fn slot(lamp: Lamp) -> usize {
        match lamp {
            Lamp::Primary => 0,
            Lamp::Secondary => 1,
        }
    }
}

impl SignalOutput for RecordingLamps {
    fn set_active(&mut self, lamp: Lamp, active: bool) -> Result<(), ChannelError> {
        trace!(%lamp, active, "Lamp switched");
        self.transitions.push((lamp, active));
        self.lit[Self::slot(lamp)] = active;
        Ok(())
    }
}

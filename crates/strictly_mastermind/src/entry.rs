//! Digit entry by counting button presses.

use super::channel::{ChannelError, Clock, PulseInput};
use super::timing::GameTiming;
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Turns a burst of button presses into one number.
///
/// Presses are counted on the rising edge, so a press held across several
/// polls counts once. A press still held when the read starts belongs to
/// the previous digit and is not counted. The reader waits indefinitely for the first press;
/// from that moment a fixed window of `timeout` is open and every further
/// press inside it adds one. When the window closes the count is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitEntryReader {
    timeout: Duration,
    poll_interval: Duration,
}

impl DigitEntryReader {
    /// Creates a reader with an explicit window and poll cadence.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a reader from the game timing.
    pub fn from_timing(timing: &GameTiming) -> Self {
        Self::new(*timing.entry_timeout(), *timing.poll_interval())
    }

    /// Blocks until a digit has been entered and returns the press count.
    ///
    /// The result is always at least 1.
    ///
    /// # Errors
    ///
    /// Propagates the first failed poll.
    #[instrument(skip(self, input, clock), fields(timeout_ms = self.timeout.as_millis()))]
    pub fn read_digit<I, C>(&self, input: &mut I, clock: &C) -> Result<u32, ChannelError>
    where
        I: PulseInput + ?Sized,
        C: Clock + ?Sized,
    {
        input.discard_pending()?;
        let mut count = 0u32;
        let mut was_active = input.poll()?;
        let mut window_start: Option<Duration> = None;
        if was_active {
            trace!("Button already held, waiting for release");
        }

        loop {
            let now = clock.now();
            if let Some(start) = window_start
                && now.saturating_sub(start) >= self.timeout
            {
                break;
            }

            let active = input.poll()?;
            if active && !was_active {
                count = count.saturating_add(1);
                window_start.get_or_insert(now);
                trace!(count, "Pulse registered");
            }
            was_active = active;

            clock.sleep(self.poll_interval);
        }

        debug!(count, "Digit entered");
        Ok(count)
    }
}

//! The round protocol.
//!
//! A round walks through explicit phases:
//!
//! ```text
//! Collecting(0) -> .. -> Collecting(SEQL-1) -> Validating -> Scoring -> Feedback -> Won
//!                                                   |                        |
//!                                                   +------> Retry <---------+
//! ```
//!
//! `Retry` signals "try again" and loops back to `Collecting(0)`. `Won` is
//! terminal. The controller owns the hardware and the game state; nothing
//! else mutates either.

use super::channel::{ChannelError, Clock, Lamp, PulseInput, SignalOutput};
use super::entry::DigitEntryReader;
use super::feedback::{Signaller, encode};
use super::scoring;
use super::timing::GameTiming;
use super::types::{SEQL, Score, Sequence, SequenceError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Red blinks acknowledging a digit.
pub const ACKNOWLEDGE_BLINKS: u8 = 1;
/// Red blinks closing the input of a guess.
pub const END_OF_INPUT_BLINKS: u8 = 2;
/// Red blinks asking for another guess.
pub const RETRY_BLINKS: u8 = 3;
/// Green blinks, under a steady red lamp, celebrating a win.
pub const VICTORY_BLINKS: u8 = 3;

// ─────────────────────────────────────────────────────────────
//  Phases
// ─────────────────────────────────────────────────────────────

/// Why a round ended without a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryReason {
    /// The guess was scored and did not match.
    Mismatch(Score),
    /// The guess was not fit for scoring and was discarded.
    Rejected(SequenceError),
}

/// One state of the round state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundPhase {
    /// Reading digit `index` of `guess`.
    Collecting {
        /// Slot being filled.
        index: usize,
        /// Digits entered so far (unfilled slots are 0).
        guess: Sequence,
    },
    /// Checking a fully entered guess.
    Validating(Sequence),
    /// Comparing a valid guess with the secret.
    Scoring(Sequence),
    /// Signalling a score.
    Feedback(Score),
    /// The secret was found (terminal).
    Won(Score),
    /// The round must be replayed.
    Retry(RetryReason),
}

impl RoundPhase {
    /// The first phase of every round.
    pub fn start() -> Self {
        RoundPhase::Collecting {
            index: 0,
            guess: Sequence::default(),
        }
    }

    /// True for [`RoundPhase::Won`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundPhase::Won(_))
    }

    fn label(&self) -> &'static str {
        match self {
            RoundPhase::Collecting { .. } => "collecting",
            RoundPhase::Validating(_) => "validating",
            RoundPhase::Scoring(_) => "scoring",
            RoundPhase::Feedback(_) => "feedback",
            RoundPhase::Won(_) => "won",
            RoundPhase::Retry(_) => "retry",
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The guess matched the secret.
    Won(Score),
    /// Another round is needed.
    Retry(RetryReason),
}

// ─────────────────────────────────────────────────────────────
//  Events
// ─────────────────────────────────────────────────────────────

/// Notifications published while a game runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The controller is waiting for digit `index`.
    DigitRequested {
        /// Slot about to be read.
        index: usize,
    },
    /// A digit was entered.
    DigitEntered {
        /// Slot that was filled.
        index: usize,
        /// Number of presses counted.
        value: u32,
    },
    /// Every slot of the guess has been entered.
    InputComplete {
        /// The guess as entered.
        guess: Sequence,
    },
    /// The guess failed validation and was discarded.
    GuessRejected {
        /// The discarded guess.
        guess: Sequence,
        /// Why it was discarded.
        error: SequenceError,
    },
    /// A guess was scored.
    RoundScored {
        /// Number of scored rounds, this one included.
        attempt: u32,
        /// The scored guess.
        guess: Sequence,
        /// Its score.
        score: Score,
    },
    /// The player must guess again.
    TryAgain {
        /// Scored rounds so far.
        attempts: u32,
    },
    /// The secret was found.
    Won {
        /// Scored rounds it took.
        attempts: u32,
    },
}

/// Receiver of [`GameEvent`]s.
pub trait EventSink {
    /// Handles one event.
    fn publish(&mut self, event: GameEvent);
}

impl EventSink for () {
    fn publish(&mut self, _event: GameEvent) {}
}

impl EventSink for Vec<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn publish(&mut self, event: GameEvent) {
        (**self).publish(event);
    }
}

// ─────────────────────────────────────────────────────────────
//  Game state
// ─────────────────────────────────────────────────────────────

/// Everything a game remembers between rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    secret: Sequence,
    attempts: u32,
    found: bool,
}

impl GameState {
    /// Creates the state for a fresh game.
    pub fn new(secret: Sequence) -> Self {
        Self {
            secret,
            attempts: 0,
            found: false,
        }
    }

    /// The secret sequence.
    pub fn secret(&self) -> &Sequence {
        &self.secret
    }

    /// Number of scored rounds.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// True once the secret has been found.
    pub fn found(&self) -> bool {
        self.found
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// The secret that was found.
    pub secret: Sequence,
    /// Scored rounds, the winning one included.
    pub attempts: u32,
    /// Score of the winning round.
    pub score: Score,
}

// ─────────────────────────────────────────────────────────────
//  Controller
// ─────────────────────────────────────────────────────────────

/// Runs rounds against one secret.
#[derive(Debug)]
pub struct RoundController<I, O, C, E = ()> {
    input: I,
    output: O,
    clock: C,
    events: E,
    reader: DigitEntryReader,
    signaller: Signaller,
    timing: GameTiming,
    state: GameState,
}

impl<I, O, C> RoundController<I, O, C, ()>
where
    I: PulseInput,
    O: SignalOutput,
    C: Clock,
{
    /// Creates a controller for `secret`.
    ///
    /// The secret is used as given; a degenerate secret simply cannot be
    /// matched by a valid guess.
    #[instrument(skip(input, output, clock))]
    pub fn new(secret: Sequence, input: I, output: O, clock: C, timing: GameTiming) -> Self {
        if let Err(error) = secret.validate() {
            warn!(%secret, %error, "Secret is not a valid sequence");
        }
        Self {
            input,
            output,
            clock,
            events: (),
            reader: DigitEntryReader::from_timing(&timing),
            signaller: Signaller::from_timing(&timing),
            timing,
            state: GameState::new(secret),
        }
    }
}

impl<I, O, C, E> RoundController<I, O, C, E>
where
    I: PulseInput,
    O: SignalOutput,
    C: Clock,
    E: EventSink,
{
    /// Replaces the event sink.
    pub fn with_events<F: EventSink>(self, events: F) -> RoundController<I, O, C, F> {
        RoundController {
            input: self.input,
            output: self.output,
            clock: self.clock,
            events,
            reader: self.reader,
            signaller: self.signaller,
            timing: self.timing,
            state: self.state,
        }
    }

    /// The game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The button backend.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// The lamp backend.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// The event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Performs one transition and returns the next phase.
    ///
    /// `Won` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Any button or lamp failure; the game cannot continue after one.
    #[instrument(skip(self), fields(attempts = self.state.attempts))]
    pub fn advance(&mut self, phase: RoundPhase) -> Result<RoundPhase, ChannelError> {
        let next = match phase {
            RoundPhase::Collecting { index, guess } => self.collect(index, guess)?,
            RoundPhase::Validating(guess) => self.validate(guess),
            RoundPhase::Scoring(guess) => self.score(guess),
            RoundPhase::Feedback(score) => self.feedback(score)?,
            RoundPhase::Retry(reason) => self.retry(reason)?,
            RoundPhase::Won(score) => RoundPhase::Won(score),
        };
        debug!(next = next.label(), "Phase transition");
        Ok(next)
    }

    /// Plays one round from the first digit to a win or a retry.
    ///
    /// On a retry the "try again" signal has already been given when this
    /// returns.
    ///
    /// # Errors
    ///
    /// Any button or lamp failure.
    #[instrument(skip(self))]
    pub fn play_round(&mut self) -> Result<RoundOutcome, ChannelError> {
        let mut phase = RoundPhase::start();
        loop {
            phase = match phase {
                RoundPhase::Won(score) => return Ok(RoundOutcome::Won(score)),
                RoundPhase::Retry(reason) => {
                    self.advance(RoundPhase::Retry(reason))?;
                    return Ok(RoundOutcome::Retry(reason));
                }
                other => self.advance(other)?,
            };
        }
    }

    /// Plays rounds until the secret is found.
    ///
    /// # Errors
    ///
    /// Any button or lamp failure.
    #[instrument(skip(self))]
    pub fn play(&mut self) -> Result<GameSummary, ChannelError> {
        info!("Game started");
        loop {
            if let RoundOutcome::Won(score) = self.play_round()? {
                let summary = GameSummary {
                    secret: self.state.secret,
                    attempts: self.state.attempts,
                    score,
                };
                info!(attempts = summary.attempts, "Secret found");
                return Ok(summary);
            }
        }
    }

    fn collect(&mut self, index: usize, mut guess: Sequence) -> Result<RoundPhase, ChannelError> {
        self.events.publish(GameEvent::DigitRequested { index });
        let count = self.reader.read_digit(&mut self.input, &self.clock)?;
        let value = u8::try_from(count).unwrap_or(u8::MAX);
        guess.set(index, value);
        debug!(index, count, "Digit stored");
        self.events.publish(GameEvent::DigitEntered {
            index,
            value: count,
        });

        self.clock.sleep(*self.timing.acknowledge_pause());
        self.signaller.blink(
            &mut self.output,
            &self.clock,
            Lamp::Secondary,
            ACKNOWLEDGE_BLINKS,
        )?;
        self.signaller
            .blink(&mut self.output, &self.clock, Lamp::Primary, value)?;

        if index + 1 < SEQL {
            return Ok(RoundPhase::Collecting {
                index: index + 1,
                guess,
            });
        }

        self.clock.sleep(*self.timing.end_of_input_pause());
        self.signaller.blink(
            &mut self.output,
            &self.clock,
            Lamp::Secondary,
            END_OF_INPUT_BLINKS,
        )?;
        self.events.publish(GameEvent::InputComplete { guess });
        Ok(RoundPhase::Validating(guess))
    }

    fn validate(&mut self, guess: Sequence) -> RoundPhase {
        match guess.validate() {
            Ok(_) => RoundPhase::Scoring(guess),
            Err(error) => {
                warn!(%guess, %error, "Guess rejected");
                self.events
                    .publish(GameEvent::GuessRejected { guess, error });
                RoundPhase::Retry(RetryReason::Rejected(error))
            }
        }
    }

    fn score(&mut self, guess: Sequence) -> RoundPhase {
        let score = scoring::score(&self.state.secret, &guess);
        self.state.attempts += 1;
        info!(attempt = self.state.attempts, %guess, %score, "Round scored");
        self.events.publish(GameEvent::RoundScored {
            attempt: self.state.attempts,
            guess,
            score,
        });
        RoundPhase::Feedback(score)
    }

    fn feedback(&mut self, score: Score) -> Result<RoundPhase, ChannelError> {
        self.signaller
            .emit(&mut self.output, &self.clock, &encode(&score))?;
        if !score.is_win() {
            return Ok(RoundPhase::Retry(RetryReason::Mismatch(score)));
        }

        self.state.found = true;
        self.events.publish(GameEvent::Won {
            attempts: self.state.attempts,
        });
        self.signaller.blink_under(
            &mut self.output,
            &self.clock,
            Lamp::Secondary,
            Lamp::Primary,
            VICTORY_BLINKS,
        )?;
        Ok(RoundPhase::Won(score))
    }

    fn retry(&mut self, reason: RetryReason) -> Result<RoundPhase, ChannelError> {
        debug!(?reason, "Asking for another guess");
        self.events.publish(GameEvent::TryAgain {
            attempts: self.state.attempts,
        });
        self.signaller
            .blink(&mut self.output, &self.clock, Lamp::Secondary, RETRY_BLINKS)?;
        Ok(RoundPhase::start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RecordingLamps, ScriptedButton, SimulatedClock};
    use std::time::Duration;

    type SimController =
        RoundController<ScriptedButton, RecordingLamps, SimulatedClock, Vec<GameEvent>>;

    fn controller(secret: [u8; SEQL], digits: &[u32]) -> SimController {
        let clock = SimulatedClock::new();
        let button = ScriptedButton::typing(
            clock.clone(),
            Duration::from_millis(500),
            Duration::from_millis(50),
            Duration::from_secs(30),
            digits,
        );
        let timing = GameTiming::new().with_poll_interval(Duration::from_millis(10));
        RoundController::new(
            Sequence::new(secret),
            button,
            RecordingLamps::new(),
            clock,
            timing,
        )
        .with_events(Vec::new())
    }

    #[test]
    fn test_collecting_reads_and_echoes_digit() {
        let mut game = controller([1, 2, 3], &[2]);
        let next = game.advance(RoundPhase::start()).unwrap();
        assert_eq!(
            next,
            RoundPhase::Collecting {
                index: 1,
                guess: Sequence::new([2, 0, 0]),
            }
        );
        assert_eq!(
            game.output().blinks(),
            vec![(Lamp::Secondary, 1), (Lamp::Primary, 2)]
        );
    }

    #[test]
    fn test_last_digit_moves_to_validation() {
        let mut game = controller([1, 2, 3], &[3]);
        let next = game
            .advance(RoundPhase::Collecting {
                index: SEQL - 1,
                guess: Sequence::new([1, 2, 0]),
            })
            .unwrap();
        assert_eq!(next, RoundPhase::Validating(Sequence::new([1, 2, 3])));
        assert_eq!(
            game.output().blinks(),
            vec![(Lamp::Secondary, 1), (Lamp::Primary, 3), (Lamp::Secondary, 2)]
        );
    }

    #[test]
    fn test_incomplete_guess_is_rejected() {
        let mut game = controller([1, 2, 3], &[]);
        let next = game
            .advance(RoundPhase::Validating(Sequence::new([1, 0, 2])))
            .unwrap();
        assert_eq!(
            next,
            RoundPhase::Retry(RetryReason::Rejected(SequenceError::Incomplete { index: 1 }))
        );
        assert_eq!(game.state().attempts(), 0);
    }

    #[test]
    fn test_scoring_counts_attempt() {
        let mut game = controller([1, 2, 3], &[]);
        let next = game
            .advance(RoundPhase::Scoring(Sequence::new([3, 2, 1])))
            .unwrap();
        assert_eq!(next, RoundPhase::Feedback(Score::new(1, 2)));
        assert_eq!(game.state().attempts(), 1);
    }

    #[test]
    fn test_feedback_without_win_retries() {
        let mut game = controller([1, 2, 3], &[]);
        let next = game.advance(RoundPhase::Feedback(Score::new(0, 2))).unwrap();
        assert_eq!(next, RoundPhase::Retry(RetryReason::Mismatch(Score::new(0, 2))));
        assert_eq!(
            game.output().blinks(),
            vec![(Lamp::Secondary, 1), (Lamp::Primary, 2)]
        );
        assert!(!game.state().found());
    }

    #[test]
    fn test_full_match_wins() {
        let mut game = controller([1, 2, 3], &[]);
        let next = game.advance(RoundPhase::Feedback(Score::new(3, 0))).unwrap();
        assert!(next.is_terminal());
        assert!(game.state().found());
        assert!(!game.output().is_lit(Lamp::Secondary));
    }

    #[test]
    fn test_retry_signals_and_restarts() {
        let mut game = controller([1, 2, 3], &[]);
        let next = game
            .advance(RoundPhase::Retry(RetryReason::Mismatch(Score::new(0, 0))))
            .unwrap();
        assert_eq!(next, RoundPhase::start());
        assert_eq!(game.output().blinks(), vec![(Lamp::Secondary, 3)]);
        assert_eq!(game.events(), &vec![GameEvent::TryAgain { attempts: 0 }]);
    }

    #[test]
    fn test_won_is_terminal() {
        let mut game = controller([1, 2, 3], &[]);
        let won = RoundPhase::Won(Score::new(3, 0));
        assert_eq!(game.advance(won.clone()).unwrap(), won);
        assert!(game.output().transitions().is_empty());
    }

    #[test]
    fn test_play_round_until_retry() {
        let mut game = controller([1, 2, 3], &[3, 2, 1]);
        let outcome = game.play_round().unwrap();
        assert_eq!(
            outcome,
            RoundOutcome::Retry(RetryReason::Mismatch(Score::new(1, 2)))
        );
        assert_eq!(game.state().attempts(), 1);
    }
}

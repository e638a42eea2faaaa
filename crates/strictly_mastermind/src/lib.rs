//! Strictly Mastermind - pure game logic for a one-button code-breaking game.
//!
//! The player guesses a secret sequence of coloured symbols. Each digit of a
//! guess is entered as a count of button presses, and the score comes back as
//! lamp blinks. Everything in this crate is independent of the concrete
//! hardware: the button, the lamps and the passage of time are capabilities
//! ([`PulseInput`], [`SignalOutput`], [`Clock`]) supplied by the caller.
//!
//! # Architecture
//!
//! - **Sequences**: [`Sequence`], [`Symbol`] and [`SequenceGenerator`]
//! - **Scoring**: [`score`], duplicate-safe exact/approximate matching
//! - **Entry**: [`DigitEntryReader`], rising-edge pulse counting with a timeout
//! - **Feedback**: [`encode`] and [`Signaller`], score to lamp blinks
//! - **Rounds**: [`RoundController`], the collect/validate/score/feedback loop
//!
//! # Example
//!
//! ```
//! use strictly_mastermind::{score, Sequence};
//!
//! let secret = Sequence::decode(321); // [1, 2, 3]
//! let guess = Sequence::decode(123); // [3, 2, 1]
//! let result = score(&secret, &guess);
//! assert_eq!((result.exact(), result.approximate()), (1, 2));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod channel;
mod entry;
mod feedback;
mod generator;
mod round;
mod scoring;
pub mod sim;
mod timing;
mod types;

// Crate-level exports - Domain types
pub use types::{COLS, SEQL, Score, Sequence, SequenceError, Symbol};

// Crate-level exports - Secret generation
pub use generator::SequenceGenerator;

// Crate-level exports - Scoring
pub use scoring::score;

// Crate-level exports - Hardware capabilities
pub use channel::{ChannelError, Clock, Lamp, MonotonicClock, PulseInput, SignalOutput};

// Crate-level exports - Digit entry
pub use entry::DigitEntryReader;

// Crate-level exports - Feedback protocol
pub use feedback::{OutputInstruction, Signaller, encode};

// Crate-level exports - Round protocol
pub use round::{
    ACKNOWLEDGE_BLINKS, END_OF_INPUT_BLINKS, EventSink, GameEvent, GameState, GameSummary,
    RETRY_BLINKS, RetryReason, RoundController, RoundOutcome, RoundPhase, VICTORY_BLINKS,
};

// Crate-level exports - Timing
pub use timing::GameTiming;

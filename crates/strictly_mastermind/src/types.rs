//! Core domain types for mastermind.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Length of every sequence (secret and guess).
pub const SEQL: usize = 3;

/// Number of distinct symbols. Valid digits are `1..=COLS`.
pub const COLS: u8 = 3;

/// A game symbol.
///
/// Symbols are entered and displayed as their digit (`1..=COLS`); the colour
/// name is only for narration.
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
pub enum Symbol {
    /// Digit 1.
    Red = 1,
    /// Digit 2.
    Green = 2,
    /// Digit 3.
    Blue = 3,
}

impl Symbol {
    /// Converts a digit into a symbol, `None` outside `1..=COLS`.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Symbol::Red),
            2 => Some(Symbol::Green),
            3 => Some(Symbol::Blue),
            _ => None,
        }
    }

    /// Returns the digit this symbol is entered as.
    pub fn digit(self) -> u8 {
        self as u8
    }
}

/// Error raised when a sequence is not fit for scoring.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::Error,
)]
pub enum SequenceError {
    /// A slot still holds the reserved value `0`.
    #[display("Slot {} is empty (no pulses registered)", index)]
    Incomplete {
        /// Index of the first empty slot.
        index: usize,
    },

    /// A slot holds a digit greater than `COLS`.
    #[display("Slot {} holds {}, expected 1..={}", index, value, COLS)]
    OutOfRange {
        /// Index of the offending slot.
        index: usize,
        /// The digit found there.
        value: u8,
    },
}

/// A fixed-length sequence of digits.
///
/// A sequence may hold any digit while it is being built or decoded. Only a
/// sequence that passes [`Sequence::validate`] should be scored; a `0` marks
/// a slot that was never filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sequence {
    digits: [u8; SEQL],
}

impl Sequence {
    /// Creates a sequence from raw digits (unchecked).
    pub fn new(digits: [u8; SEQL]) -> Self {
        Self { digits }
    }

    /// Creates a sequence from symbols. The result is always valid.
    pub fn from_symbols(symbols: [Symbol; SEQL]) -> Self {
        Self {
            digits: symbols.map(Symbol::digit),
        }
    }

    /// Returns the raw digits.
    pub fn digits(&self) -> &[u8; SEQL] {
        &self.digits
    }

    /// Returns the digit at `index`.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.digits.get(index).copied()
    }

    /// Stores `value` at `index`. Out-of-range indices are ignored.
    pub(crate) fn set(&mut self, index: usize, value: u8) {
        if let Some(slot) = self.digits.get_mut(index) {
            *slot = value;
        }
    }

    /// True when no slot holds the reserved value `0`.
    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(|&d| d != 0)
    }

    /// Checks that every slot holds a digit in `1..=COLS`.
    ///
    /// # Errors
    ///
    /// Reports the first empty slot, or failing that the first slot above
    /// `COLS`.
    #[instrument]
    pub fn validate(&self) -> Result<[Symbol; SEQL], SequenceError> {
        if let Some(index) = self.digits.iter().position(|&d| d == 0) {
            return Err(SequenceError::Incomplete { index });
        }
        let mut symbols = [Symbol::Red; SEQL];
        for (index, (&value, slot)) in self.digits.iter().zip(symbols.iter_mut()).enumerate() {
            *slot = Symbol::from_digit(value).ok_or(SequenceError::OutOfRange { index, value })?;
        }
        Ok(symbols)
    }

    /// Formats the sequence with colour names, e.g. `red green blue`.
    ///
    /// Digits outside the alphabet are shown as `?`.
    pub fn colour_names(&self) -> String {
        self.digits
            .iter()
            .map(|&d| Symbol::from_digit(d).map_or_else(|| "?".to_string(), |s| s.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<[u8; SEQL]> for Sequence {
    fn from(digits: [u8; SEQL]) -> Self {
        Self::new(digits)
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self
            .digits
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", text)
    }
}

/// Result of comparing a guess with the secret.
///
/// Invariant: `exact + approximate <= SEQL`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[display("{exact} exact, {approximate} approximate")]
pub struct Score {
    exact: u8,
    approximate: u8,
}

impl Score {
    /// Creates a score.
    pub fn new(exact: u8, approximate: u8) -> Self {
        debug_assert!(
            usize::from(exact) + usize::from(approximate) <= SEQL,
            "score exceeds sequence length"
        );
        Self { exact, approximate }
    }

    /// Number of symbols in the right position.
    pub fn exact(&self) -> u8 {
        self.exact
    }

    /// Number of symbols present elsewhere in the secret.
    pub fn approximate(&self) -> u8 {
        self.approximate
    }

    /// True when every position matched.
    pub fn is_win(&self) -> bool {
        usize::from(self.exact) == SEQL
    }

    /// Single-integer form `exact * 10 + approximate`.
    ///
    /// Only unambiguous while both components stay below 10, which holds for
    /// `SEQL <= 9`. Kept for the textual report; use the fields everywhere
    /// else.
    pub fn legacy_code(&self) -> u32 {
        u32::from(self.exact) * 10 + u32::from(self.approximate)
    }

    /// The two-line textual report: `"<exact> exact\n<approximate> approximate\n"`.
    pub fn report(&self) -> String {
        let code = self.legacy_code();
        format!("{} exact\n{} approximate\n", code / 10, code % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_symbol_digits_cover_alphabet() {
        let digits: Vec<u8> = Symbol::iter().map(Symbol::digit).collect();
        assert_eq!(digits, (1..=COLS).collect::<Vec<_>>());
        assert_eq!(Symbol::from_digit(0), None);
        assert_eq!(Symbol::from_digit(COLS + 1), None);
    }

    #[test]
    fn test_validate_reports_first_empty_slot() {
        let seq = Sequence::new([1, 0, 0]);
        assert!(!seq.is_complete());
        assert_eq!(seq.validate(), Err(SequenceError::Incomplete { index: 1 }));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let seq = Sequence::new([1, 7, 2]);
        assert!(seq.is_complete());
        assert_eq!(
            seq.validate(),
            Err(SequenceError::OutOfRange { index: 1, value: 7 })
        );
    }

    #[test]
    fn test_sequence_error_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(SequenceError::OutOfRange { index: 0, value: 4 });
        assert_eq!(error.to_string(), "Slot 0 holds 4, expected 1..=3");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_validate_accepts_symbols() {
        let seq = Sequence::new([3, 1, 2]);
        assert_eq!(
            seq.validate(),
            Ok([Symbol::Blue, Symbol::Red, Symbol::Green])
        );
        assert_eq!(seq.colour_names(), "blue red green");
    }

    #[test]
    fn test_display_is_space_separated() {
        assert_eq!(Sequence::new([1, 2, 3]).to_string(), "1 2 3");
    }

    #[test]
    fn test_report_format() {
        assert_eq!(Score::new(1, 2).report(), "1 exact\n2 approximate\n");
        assert_eq!(Score::new(0, 0).report(), "0 exact\n0 approximate\n");
    }

    #[test]
    fn test_legacy_code() {
        let score = Score::new(3, 0);
        assert_eq!(score.legacy_code(), 30);
        assert_eq!(Score::new(1, 2).legacy_code(), 12);
        assert!(score.is_win());
        assert!(!Score::new(2, 1).is_win());
    }
}

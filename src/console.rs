//! Console narration of a running game.

use crossterm::{
    cursor::MoveToColumn,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::Write;
use strictly_mastermind::{EventSink, GameEvent, SequenceError};
use tracing::{instrument, warn};

/// Closing line printed after a won game.
pub const FAREWELL: &str = "Thank you for playing Mastermind! Have a great day :)";

/// Writes a line of narration for each [`GameEvent`].
///
/// In raw mode the terminal does no newline translation, so lines end in
/// `\r\n` and the lamp status line is cleared before each one.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    debug: bool,
    raw: bool,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter for a cooked terminal or a plain writer.
    pub fn new(out: W, debug: bool) -> Self {
        Self {
            out,
            debug,
            raw: false,
        }
    }

    /// Switches to raw-terminal line endings.
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one line of narration.
    pub fn line(&mut self, text: &str) -> std::io::Result<()> {
        if self.raw {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            write!(self.out, "{}\r\n", text)?;
        } else {
            writeln!(self.out, "{}", text)?;
        }
        self.out.flush()
    }

    fn lines(&mut self, text: &str) -> std::io::Result<()> {
        for line in text.lines() {
            self.line(line)?;
        }
        Ok(())
    }

    fn narrate(&mut self, event: &GameEvent) -> std::io::Result<()> {
        match event {
            GameEvent::DigitRequested { index } => self.line(&format!("Enter Digit {}", index + 1)),
            GameEvent::DigitEntered { value, .. } => self.line(&value.to_string()),
            GameEvent::InputComplete { guess } if self.debug => {
                self.line(&format!("Your guess: {}", guess))
            }
            GameEvent::InputComplete { .. } => Ok(()),
            GameEvent::GuessRejected { guess, error } => {
                let reason = match error {
                    SequenceError::Incomplete { index } => {
                        format!("digit {} is missing", index + 1)
                    }
                    SequenceError::OutOfRange { index, value } => {
                        format!("digit {} is {}, which is not a colour", index + 1, value)
                    }
                };
                self.line(&format!("Guess {} not accepted: {}", guess, reason))
            }
            GameEvent::RoundScored { score, .. } if self.debug => self.lines(&score.report()),
            GameEvent::RoundScored { .. } => Ok(()),
            GameEvent::TryAgain { .. } => self.line("Try Again!"),
            GameEvent::Won { attempts } => {
                self.line("You guessed the sequence correctly!")?;
                self.line(&format!("You took {} attempts!", attempts))?;
                self.line("")
            }
        }
    }
}

impl<W: Write> EventSink for ConsoleReporter<W> {
    #[instrument(skip(self))]
    fn publish(&mut self, event: GameEvent) {
        if let Err(e) = self.narrate(&event) {
            warn!(error = %e, "Failed to write narration");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_mastermind::{Score, Sequence};

    fn transcript(debug: bool, events: Vec<GameEvent>) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), debug);
        for event in events {
            reporter.publish(event);
        }
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_digit_prompts_are_one_based() {
        let text = transcript(
            false,
            vec![
                GameEvent::DigitRequested { index: 0 },
                GameEvent::DigitEntered { index: 0, value: 2 },
            ],
        );
        assert_eq!(text, "Enter Digit 1\n2\n");
    }

    #[test]
    fn test_scores_only_in_debug() {
        let scored = GameEvent::RoundScored {
            attempt: 1,
            guess: Sequence::new([3, 2, 1]),
            score: Score::new(1, 2),
        };
        assert_eq!(transcript(false, vec![scored.clone()]), "");
        assert_eq!(transcript(true, vec![scored]), "1 exact\n2 approximate\n");
    }

    #[test]
    fn test_victory_lines() {
        let text = transcript(false, vec![GameEvent::Won { attempts: 4 }]);
        assert_eq!(
            text,
            "You guessed the sequence correctly!\nYou took 4 attempts!\n\n"
        );
    }

    #[test]
    fn test_raw_mode_uses_carriage_returns() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false).raw();
        reporter.publish(GameEvent::TryAgain { attempts: 1 });
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.ends_with("Try Again!\r\n"));
    }
}

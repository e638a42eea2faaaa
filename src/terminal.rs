//! Keyboard button and on-screen lamps.

use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Color, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType},
};
use std::io::Write;
use std::time::Duration;
use strictly_mastermind::{ChannelError, Lamp, PulseInput, SignalOutput};
use tracing::{debug, info, instrument};

/// Puts the terminal in raw mode until dropped.
#[derive(Debug)]
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Enables raw mode.
    #[instrument]
    pub fn enable() -> Result<Self, ChannelError> {
        terminal::enable_raw_mode()?;
        debug!("Raw mode enabled");
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::error!(error = %e, "Failed to restore terminal");
        }
    }
}

/// What a key press means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// The button was pressed.
    Press,
    /// The player asked to leave.
    Quit,
    /// Any other key.
    Ignore,
}

/// Classifies a key event against the configured button key.
pub fn classify(key: &KeyEvent, button: char) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    match key.code {
        KeyCode::Char(c) if c == button => KeyAction::Press,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

/// Where key events come from.
pub trait KeySource {
    /// Returns the next queued key event without blocking.
    ///
    /// # Errors
    ///
    /// A failed terminal read.
    fn next_key(&mut self) -> Result<Option<KeyEvent>, ChannelError>;
}

/// Key events from the crossterm event queue.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Option<KeyEvent>, ChannelError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

/// A keyboard key acting as the push button.
///
/// A key press has no duration in a terminal, so each press reads as
/// active for exactly one poll and inactive on the next.
#[derive(Debug)]
pub struct KeyboardButton<S = TerminalKeys> {
    source: S,
    key: char,
    reported: bool,
}

impl KeyboardButton {
    /// Creates a button bound to `key`. Raw mode must be on.
    pub fn new(key: char) -> Self {
        Self::with_source(TerminalKeys, key)
    }
}

impl<S: KeySource> KeyboardButton<S> {
    /// Creates a button bound to `key` that reads from `source`.
    pub fn with_source(source: S, key: char) -> Self {
        Self {
            source,
            key,
            reported: false,
        }
    }

    fn quit() -> ChannelError {
        info!("Player quit");
        ChannelError::new("Interrupted by player")
    }
}

impl<S: KeySource> PulseInput for KeyboardButton<S> {
    fn poll(&mut self) -> Result<bool, ChannelError> {
        if self.reported {
            self.reported = false;
            return Ok(false);
        }
        while let Some(key) = self.source.next_key()? {
            match classify(&key, self.key) {
                KeyAction::Press => {
                    self.reported = true;
                    return Ok(true);
                }
                KeyAction::Quit => return Err(Self::quit()),
                KeyAction::Ignore => {}
            }
        }
        Ok(false)
    }

    /// Presses typed while the game was signalling are dropped; a quit key
    /// among them still ends the game.
    fn discard_pending(&mut self) -> Result<(), ChannelError> {
        self.reported = false;
        let mut dropped = 0u32;
        while let Some(key) = self.source.next_key()? {
            match classify(&key, self.key) {
                KeyAction::Press => dropped += 1,
                KeyAction::Quit => return Err(Self::quit()),
                KeyAction::Ignore => {}
            }
        }
        if dropped > 0 {
            debug!(dropped, "Discarded presses typed outside the entry window");
        }
        Ok(())
    }
}

/// Two lamps drawn as coloured dots on the current line.
#[derive(Debug)]
pub struct TerminalLamps<W: Write> {
    out: W,
    primary: bool,
    secondary: bool,
}

impl<W: Write> TerminalLamps<W> {
    /// Creates the lamps, both off.
    pub fn new(out: W) -> Self {
        Self {
            out,
            primary: false,
            secondary: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self) -> std::io::Result<()> {
        let green = if self.primary {
            "●".with(Color::Green)
        } else {
            "○".with(Color::DarkGrey)
        };
        let red = if self.secondary {
            "●".with(Color::Red)
        } else {
            "○".with(Color::DarkGrey)
        };
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(red),
            PrintStyledContent(" ".stylize()),
            PrintStyledContent(green),
        )?;
        self.out.flush()
    }
}

impl<W: Write> SignalOutput for TerminalLamps<W> {
    fn set_active(&mut self, lamp: Lamp, active: bool) -> Result<(), ChannelError> {
        match lamp {
            Lamp::Primary => self.primary = active,
            Lamp::Secondary => self.secondary = active,
        }
        self.render()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use strictly_mastermind::DigitEntryReader;
    use strictly_mastermind::Clock;
    use strictly_mastermind::sim::SimulatedClock;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_button_key_is_a_press() {
        let space = key(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(classify(&space, ' '), KeyAction::Press);
        assert_eq!(classify(&space, 'b'), KeyAction::Ignore);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            classify(&key(KeyCode::Esc, KeyModifiers::NONE), ' '),
            KeyAction::Quit
        );
        assert_eq!(
            classify(&key(KeyCode::Char('q'), KeyModifiers::NONE), ' '),
            KeyAction::Quit
        );
        assert_eq!(
            classify(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), ' '),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_bound_key_wins_over_quit() {
        let q = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(classify(&q, 'q'), KeyAction::Press);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut release = key(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(classify(&release, ' '), KeyAction::Ignore);
    }

    struct Typed(VecDeque<KeyEvent>);

    impl KeySource for Typed {
        fn next_key(&mut self) -> Result<Option<KeyEvent>, ChannelError> {
            Ok(self.0.pop_front())
        }
    }

    fn typed(codes: &[KeyCode]) -> KeyboardButton<Typed> {
        let events = codes
            .iter()
            .map(|&code| key(code, KeyModifiers::NONE))
            .collect();
        KeyboardButton::with_source(Typed(events), ' ')
    }

    #[test]
    fn test_press_reads_active_for_one_poll() {
        let mut button = typed(&[KeyCode::Char(' '), KeyCode::Char(' ')]);
        assert!(button.poll().unwrap());
        assert!(!button.poll().unwrap());
        assert!(button.poll().unwrap());
        assert!(!button.poll().unwrap());
        assert!(!button.poll().unwrap());
    }

    #[test]
    fn test_queued_presses_are_discarded() {
        let mut button = typed(&[KeyCode::Char(' '), KeyCode::Char('x'), KeyCode::Char(' ')]);
        button.discard_pending().unwrap();
        assert!(!button.poll().unwrap());
    }

    /// Events that become readable once the simulated clock reaches them.
    struct Scheduled {
        clock: SimulatedClock,
        events: VecDeque<(Duration, KeyEvent)>,
    }

    impl KeySource for Scheduled {
        fn next_key(&mut self) -> Result<Option<KeyEvent>, ChannelError> {
            match self.events.front() {
                Some(&(at, _)) if at <= self.clock.now() => {
                    Ok(self.events.pop_front().map(|(_, key)| key))
                }
                _ => Ok(None),
            }
        }
    }

    #[test]
    fn test_queued_presses_do_not_reach_the_next_digit() {
        let clock = SimulatedClock::new();
        let space = key(KeyCode::Char(' '), KeyModifiers::NONE);
        let source = Scheduled {
            clock: clock.clone(),
            // Three presses typed during the previous signal, one live press.
            events: VecDeque::from([
                (Duration::ZERO, space),
                (Duration::ZERO, space),
                (Duration::ZERO, space),
                (Duration::from_millis(50), space),
            ]),
        };
        let mut button = KeyboardButton::with_source(source, ' ');
        let reader = DigitEntryReader::new(Duration::from_millis(100), Duration::from_millis(10));
        assert_eq!(reader.read_digit(&mut button, &clock).unwrap(), 1);
    }

    #[test]
    fn test_quit_while_discarding_is_fatal() {
        let mut button = typed(&[KeyCode::Char(' '), KeyCode::Esc]);
        let err = button.discard_pending().unwrap_err();
        assert_eq!(err.message, "Interrupted by player");
    }

    #[test]
    fn test_lamps_render_state() {
        let mut lamps = TerminalLamps::new(Vec::new());
        lamps.set_active(Lamp::Primary, true).unwrap();
        lamps.set_active(Lamp::Secondary, false).unwrap();
        let text = String::from_utf8(lamps.into_inner()).unwrap();
        assert!(text.contains('●'));
        assert!(text.contains('○'));
    }
}

//! Run modes of the master-mind binary.

use crate::cli::Cli;
use crate::console::{ConsoleReporter, FAREWELL};
use crate::settings::Settings;
use crate::terminal::{KeyboardButton, RawModeGuard, TerminalLamps};
use std::io::{BufRead, Write};
use strictly_mastermind::{
    ChannelError, Clock, GameSummary, GameTiming, MonotonicClock, PulseInput, RoundController,
    Sequence, SequenceGenerator, SignalOutput, score,
};
use tracing::{info, instrument};

/// The secret for this run: `--secret` if given, otherwise random.
#[instrument(skip(cli), fields(secret = ?cli.secret))]
pub fn secret_for(cli: &Cli) -> Sequence {
    match cli.secret {
        Some(value) => Sequence::decode(value),
        None => SequenceGenerator::from_time().generate_random(),
    }
}

/// The settings banner printed with `--verbose`, preceded by the two
/// operands in unit-test mode.
pub fn settings_report(cli: &Cli) -> String {
    let on_off = |flag: bool| if flag { "ON" } else { "OFF" };
    let mut report = String::new();
    if let Some((first, second)) = cli.unit_test_pair() {
        report.push_str(&format!("1st argument = {}\n", first));
        report.push_str(&format!("2nd argument = {}\n", second));
    }
    report.push_str("Settings for running the program\n");
    report.push_str(&format!("Verbose is {}\n", on_off(cli.verbose)));
    report.push_str(&format!("Debug is {}\n", on_off(cli.debug)));
    report.push_str(&format!(
        "Unittest is {}\n",
        on_off(cli.unit_test.is_some())
    ));
    if let Some(secret) = cli.secret {
        report.push_str(&format!("Secret sequence set to {}\n", secret));
    }
    report
}

/// Scores `second` against `first` and prints the two-line report.
#[instrument(skip(out))]
pub fn unit_test(
    first: u64,
    second: u64,
    verbose: bool,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let secret = Sequence::decode(first);
    let guess = Sequence::decode(second);
    if verbose {
        writeln!(
            out,
            "Testing matches function with sequences {} and {}",
            first, second
        )?;
    }
    write!(out, "{}", score(&secret, &guess).report())?;
    out.flush()
}

/// Prompts and blocks until a line is read from `input`.
pub fn wait_for_enter(input: &mut impl BufRead, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "Press ENTER to continue: ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Plays one game on the given channels, narrating to `reporter`.
///
/// # Errors
///
/// Any button or lamp failure ends the game.
#[instrument(skip_all, fields(secret = %secret))]
pub fn play_session<I, O, C, W>(
    secret: Sequence,
    input: I,
    output: O,
    clock: C,
    timing: GameTiming,
    reporter: &mut ConsoleReporter<W>,
) -> Result<GameSummary, ChannelError>
where
    I: PulseInput,
    O: SignalOutput,
    C: Clock,
    W: Write,
{
    let summary = RoundController::new(secret, input, output, clock, timing)
        .with_events(&mut *reporter)
        .play()?;
    reporter.line(FAREWELL)?;
    Ok(summary)
}

/// Plays on the terminal: the button key is the button, the lamps are
/// drawn on the status line.
#[instrument(skip_all)]
pub fn run_terminal_game(cli: &Cli, settings: &Settings) -> anyhow::Result<GameSummary> {
    let secret = secret_for(cli);
    let mut stdout = std::io::stdout();

    if cli.debug {
        writeln!(
            stdout,
            "The secret sequence is: {} ({})",
            secret,
            secret.colour_names()
        )?;
    }
    if !cli.no_wait {
        wait_for_enter(&mut std::io::stdin().lock(), &mut stdout)?;
    }

    info!(button_key = ?settings.button_key(), "Starting terminal game");
    let _raw = RawModeGuard::enable()?;
    let mut reporter = ConsoleReporter::new(std::io::stdout(), cli.debug).raw();
    let summary = play_session(
        secret,
        KeyboardButton::new(*settings.button_key()),
        TerminalLamps::new(std::io::stdout()),
        MonotonicClock::new(),
        settings.timing(),
        &mut reporter,
    )?;
    Ok(summary)
}

//! Command-line interface for master-mind.

use clap::Parser;
use std::convert::Infallible;
use std::path::PathBuf;

const ABOUT: &str = "MasterMind with one button and two lamps";

const LONG_ABOUT: &str = "\
MasterMind with one button and two lamps.

Guess the secret sequence of three colours (1 = red, 2 = green, 3 = blue).
Enter each digit by pressing the button that many times, then wait for the
entry window to close. The red lamp acknowledges each digit and the green
lamp echoes it. After the third digit the red lamp blinks twice, then the
score follows: green blinks for exact matches, one red blink, green blinks
for approximate matches. Three red blinks ask for another guess.

In the terminal the button is the space bar (configurable); Esc, q or
Ctrl-C quit.";

/// Master Mind - one-button code-breaking game
#[derive(Parser, Debug, Default)]
#[command(name = "master-mind")]
#[command(about = ABOUT, long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Print the settings and extra diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Show the secret and every score on the console
    #[arg(short, long)]
    pub debug: bool,

    /// Score SEQ2 against SEQ1 and exit
    #[arg(
        short = 'u',
        long = "unit-test",
        num_args = 2,
        value_names = ["SEQ1", "SEQ2"],
        value_parser = lenient_integer
    )]
    pub unit_test: Option<Vec<u64>>,

    /// Use this secret instead of a random one (ones digit is the first symbol)
    #[arg(short, long, value_parser = lenient_integer)]
    pub secret: Option<u64>,

    /// Settings file (TOML); defaults apply when it does not exist
    #[arg(short, long, default_value = "master-mind.toml")]
    pub config: PathBuf,

    /// Start immediately instead of waiting for ENTER
    #[arg(long)]
    pub no_wait: bool,
}

impl Cli {
    /// The two unit-test operands, when unit-test mode was requested.
    pub fn unit_test_pair(&self) -> Option<(u64, u64)> {
        match self.unit_test.as_deref() {
            Some(&[first, second]) => Some((first, second)),
            _ => None,
        }
    }
}

/// Parses an integer the way C's `atoi` does.
///
/// Leading whitespace and a `+` are skipped, then digits are read up to the
/// first non-digit. Anything unparsable, and any negative number, is 0.
/// Values beyond `u64::MAX` saturate.
pub fn lenient_integer(text: &str) -> Result<u64, Infallible> {
    let text = text.trim_start();
    if text.starts_with('-') {
        return Ok(0);
    }
    let digits = text.strip_prefix('+').unwrap_or(text);
    let value = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)));
    Ok(value)
}

//! master-mind - play Master Mind with one button and two lamps.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use strictly_mastermind_cli::{Cli, Settings, app};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        print!("{}", app::settings_report(&cli));
    }

    if let Some((first, second)) = cli.unit_test_pair() {
        return app::unit_test(first, second, cli.verbose, &mut std::io::stdout())
            .map_err(Into::into);
    }

    run_game(&cli)
}

/// Logs go to stderr so stdout carries only the game's own output.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,strictly_mastermind=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[instrument(skip(cli))]
fn run_game(cli: &Cli) -> Result<()> {
    let settings = Settings::load(&cli.config)?;
    let summary = app::run_terminal_game(cli, &settings)?;
    info!(attempts = summary.attempts, "Game over");
    Ok(())
}

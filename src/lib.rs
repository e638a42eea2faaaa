//! Master Mind on a one-button, two-lamp interface.
//!
//! The game logic lives in [`strictly_mastermind`]; this crate adds the
//! command line, the settings file, console narration and a terminal
//! backend that stands in for the button and the lamps.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod console;
pub mod settings;
pub mod terminal;

pub use cli::Cli;
pub use console::ConsoleReporter;
pub use settings::{ConfigError, Settings};

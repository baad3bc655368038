//! `ruleval` command-line tool
//!
//! Exit status: 0 when the payload is valid (or every code has a message),
//! 1 when there are findings, 2 on configuration or runtime errors.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Command};

/// What a successful command run concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Clean,
    Findings,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clean => Self::SUCCESS,
            Outcome::Findings => Self::from(1_u8),
        }
    }
}

const EXIT_ERROR: u8 = 2;

/// Level used when neither `-v` nor a log variable asks for one.
const DEFAULT_LEVEL: &str = "warn";

fn log_config(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> ruleval_log::Config {
    let config = ruleval_log::Config::default()
        .with_level(DEFAULT_LEVEL)
        .with_overrides_from(lookup)
        .with_format(cli.log_format.into());

    match cli.verbose {
        0 => config,
        1 => config.with_level("info"),
        2 => config.with_level("debug"),
        _ => config.with_level("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match ruleval_log::LoggerBuilder::from_config(log_config(&cli, |key| std::env::var(key).ok())).build() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    let result = match cli.command {
        Command::Validate(args) => commands::validate(&args),
        Command::Codes(args) => commands::codes(&args),
    };

    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

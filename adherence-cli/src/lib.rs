//! Command-line interface for scoring adherence series.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod score;

pub use error::CliError;

const ARG_CONFIG: &str = "config";
const ARG_SERIES: &str = "series";
const ARG_LEDGER: &str = "ledger";
const ARG_WEEK: &str = "week";
const ENV_CONFIG: &str = "ADHERENCE_CMDS_SCORE_CONFIG";
const ENV_SERIES: &str = "ADHERENCE_CMDS_SCORE_SERIES";
const ENV_LEDGER: &str = "ADHERENCE_CMDS_SCORE_LEDGER";
const ENV_WEEK: &str = "ADHERENCE_CMDS_SCORE_WEEK";

/// Run the adherence CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, or inputs are
/// invalid, when scoring fails, or when output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => score::run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "adherence",
    about = "Score health goals against daily measurements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a series against an algorithm configuration.
    Score(score::ScoreArgs),
}

#[cfg(test)]
mod tests;

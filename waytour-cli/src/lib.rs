//! Command-line interface for planning closed walking tours.
//!
//! `waytour solve places.csv` reads named waypoints from a CSV file, asks the
//! `vrp-core` engine for the shortest closed tour starting at the first row,
//! and prints it as an arrow chain, a map polyline or JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod files;
mod input;
mod logging;
mod solve;

pub use error::CliError;
pub use logging::init_logging;

use solve::{SolveArgs, run_solve};

const ARG_SOLVE_INPUT: &str = "input";
const ARG_SOLVE_FORMAT: &str = "format";
const ARG_SOLVE_SCALE: &str = "scale";
const ARG_SOLVE_TIME_LIMIT: &str = "time-limit-secs";
const ARG_SOLVE_METAHEURISTIC: &str = "metaheuristic";
const ARG_SOLVE_FIRST_SOLUTION: &str = "first-solution";
const ARG_SOLVE_NO_ACTIVITIES: &str = "no-activities";
const ARG_SOLVE_MAX_GENERATIONS: &str = "max-generations";
const ENV_SOLVE_INPUT: &str = "WAYTOUR_CMDS_SOLVE_INPUT";

/// Run the waytour CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waytour",
    about = "Plan the shortest closed tour through a list of places",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve the tour through the places listed in a CSV file.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;

//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use waytour_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "failures are reported on stderr even when logging is unavailable"
)]
fn main() -> ExitCode {
    if let Err(err) = waytour_cli::init_logging() {
        eprintln!("waytour: logging disabled: {err}");
    }
    match waytour_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("waytour: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

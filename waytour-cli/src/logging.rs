//! Logger installation for the binary.

use std::io::Write;

use env_logger::{Builder, Env, Target, fmt::Formatter};
use log::{Level, SetLoggerError};

/// Install an `env_logger` writing to stderr.
///
/// `RUST_LOG` selects the filter; without it, `info` and above are shown.
/// Informational lines are prefixed with `#` so they read as comments next
/// to a tour printed on stdout.
pub fn init_logging() -> Result<(), SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf: &mut Formatter, record| match record.level() {
            Level::Info => writeln!(buf, "# {}", record.args()),
            level => writeln!(buf, "{} {}", level_tag(level), record.args()),
        })
        .try_init()
}

const fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

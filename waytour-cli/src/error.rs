//! Error types emitted by the waytour CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waytour_core::{MatrixError, ReportError, SolveError, TourError};

/// Errors emitted by the waytour CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The configured scale factor is unusable.
    #[error("invalid --scale: {0}")]
    InvalidScale(#[source] MatrixError),
    /// The configured time limit is zero.
    #[error("--time-limit-secs must be at least 1")]
    ZeroTimeLimit,
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// The path being inspected.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the places file failed.
    #[error("failed to open places at {path:?}: {source}")]
    OpenInput {
        /// The places file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// A row of the places file could not be decoded.
    #[error("failed to parse places CSV at {path:?}: {source}")]
    ParseInput {
        /// The places file.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// The places file has a header but no rows.
    #[error("places file {path:?} lists no places")]
    EmptyInput {
        /// The places file.
        path: Utf8PathBuf,
    },
    /// Planning the tour failed.
    #[error(transparent)]
    Plan(#[from] TourError),
    /// Rendering the tour failed.
    #[error(transparent)]
    Render(#[from] ReportError),
    /// Serializing the JSON output failed.
    #[error("failed to serialize tour: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the tour failed.
    #[error("failed to write tour: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl CliError {
    /// Process exit status for this error: `2` when no tour could be found,
    /// `1` otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Plan(TourError::Solve(SolveError::SolveFailed { .. })) => 2,
            _ => 1,
        }
    }
}

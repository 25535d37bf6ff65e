//! Error types emitted by the adherence CLI.
//!
//! Keep this error type reasonably small, as the CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use adherence_core::{ConfigurationError, EvaluationError};
use adherence_scorer::{AlgorithmType, LedgerFileError};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the adherence CLI.
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
        /// Name of the missing flag.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening an input file failed.
    #[error("failed to open {field} file at {path:?}: {source}")]
    OpenInput {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// An input file held malformed JSON.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The `--week` value is not an ISO week such as `2025-W14`.
    #[error("invalid --week: {0}")]
    InvalidWeek(#[source] EvaluationError),
    /// The algorithm configuration failed validation.
    #[error("invalid algorithm configuration: {0}")]
    BuildStrategy(#[from] ConfigurationError),
    /// A ledger was requested for a strategy that keeps none.
    #[error("{algorithm} goals do not keep an allowance ledger")]
    LedgerUnsupported {
        /// Strategy the configuration selected.
        algorithm: AlgorithmType,
    },
    /// Scoring the series failed.
    #[error("scoring failed: {0}")]
    Evaluate(#[from] EvaluationError),
    /// Reading or writing the ledger file failed.
    #[error(transparent)]
    Ledger(#[from] LedgerFileError),
    /// Serialising the score report failed.
    #[error("failed to serialise score report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the score report failed.
    #[error("failed to write score report: {0}")]
    WriteReport(#[source] std::io::Error),
}

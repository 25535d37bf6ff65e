//! Error types raised while persisting allowance ledgers.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a ledger file.
#[derive(Debug, Error)]
pub enum LedgerFileError {
    /// Creating the parent directory for the ledger file failed.
    #[error("failed to create parent directory {path}")]
    CreateParent {
        /// Path of the directory that could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Writing the ledger or swapping it into place failed.
    #[error("failed to write ledger file at {path}")]
    WriteFile {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening the ledger file for reading failed.
    #[error("failed to read ledger file at {path}")]
    ReadFile {
        /// Source file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising the ledger to `bincode` failed.
    #[error("failed to serialise ledger into {path}")]
    Serialise {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// Decoding the ledger from `bincode` failed.
    #[error("failed to decode ledger from {path}")]
    Deserialise {
        /// Source file path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
}

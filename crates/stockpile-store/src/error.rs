//! Error types for durable state operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during durable state operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to copy a file to its checkpoint backup location.
    #[error("Failed to back up '{path}' to '{backup}': {source}")]
    Backup {
        /// The live file being backed up.
        path: PathBuf,
        /// The backup destination.
        backup: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The durable ledger file exists but cannot be parsed.
    ///
    /// This is startup-fatal: silently resetting a quota that should
    /// persist risks exceeding the provider's daily cap.
    #[error("Corrupt ledger file '{path}': {detail}")]
    CorruptLedger {
        /// The unparsable file.
        path: PathBuf,
        /// What failed to parse.
        detail: String,
    },
}

/// Result type for durable state operations.
pub type Result<T> = std::result::Result<T, StoreError>;

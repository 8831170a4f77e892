//! Error types for bib preference persistence.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading or storing search preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Failed to read the preferences file.
    #[error("failed to read preferences file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse the preferences file as TOML.
    #[error("failed to parse preferences file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },

    /// Failed to write the preferences file.
    #[error("failed to write preferences file {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to determine the home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

//! Error types for the bib-search crate.

use thiserror::Error;

/// Errors reported by a fulltext backend.
///
/// These are non-fatal: execution logs them and degrades to field-only
/// matching. They are never surfaced to the user as search failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FulltextError {
    /// The backend is not running or cannot be reached.
    #[error("fulltext backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the search.
    #[error("fulltext search failed: {0}")]
    Backend(String),
}

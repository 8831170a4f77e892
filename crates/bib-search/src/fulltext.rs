//! Fulltext backend interface.

use std::collections::HashSet;

use bib_entry::EntryId;

use crate::error::FulltextError;

/// An external index over linked-file content (PDFs, attachments).
///
/// The backend receives a literal term or a pattern string together with
/// the case flag, and answers with the identities of entries whose indexed
/// content matches. Implementations are owned by the surrounding
/// application; the search core only reads from them and tolerates their
/// absence or failure.
pub trait FulltextIndex: Send + Sync {
    /// Returns the entries whose indexed content matches `needle`.
    fn search(&self, needle: &str, case_sensitive: bool)
    -> Result<HashSet<EntryId>, FulltextError>;
}

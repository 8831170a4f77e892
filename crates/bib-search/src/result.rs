//! Search result types.

use bib_entry::EntryId;

/// The outcome of executing a query against the entry collection.
///
/// Recomputed in full on every query change; the matched entries keep the
/// source collection's relative order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Identities of the matched entries, in collection order.
    matched: Vec<EntryId>,
}

impl MatchResult {
    /// Creates a result from matched identities in collection order.
    pub fn new(matched: Vec<EntryId>) -> Self {
        Self { matched }
    }

    /// The matched entry identities, in collection order.
    pub fn matched(&self) -> &[EntryId] {
        &self.matched
    }

    /// Number of matched entries.
    pub fn count(&self) -> usize {
        self.matched.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Whether the given entry is among the matches.
    pub fn contains(&self, id: &EntryId) -> bool {
        self.matched.contains(id)
    }
}

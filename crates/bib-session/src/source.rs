//! Entry collection access for evaluations.

use std::sync::RwLock;

use bib_entry::{Entry, Library};

/// Read-only access to the entry collection an evaluation scans.
///
/// The library is owned and mutated by the surrounding application;
/// evaluations take a point-in-time copy so no lock is held while a query
/// runs. Every evaluation re-reads the source in full.
pub trait EntrySource: Send + Sync + 'static {
    /// Takes a point-in-time copy of the entry collection.
    fn entries(&self) -> Vec<Entry>;
}

impl EntrySource for Library {
    fn entries(&self) -> Vec<Entry> {
        self.entries().to_vec()
    }
}

impl EntrySource for RwLock<Library> {
    fn entries(&self) -> Vec<Entry> {
        // A poisoned lock means a writer panicked; treat the library as
        // unreadable rather than propagating the panic into evaluation.
        self.read()
            .map(|library| library.entries().to_vec())
            .unwrap_or_default()
    }
}

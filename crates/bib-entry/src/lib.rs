//! Bibliographic entry model for bib.
//!
//! An [`Entry`] is one record of the active library: a stable citation-key
//! identity, an entry type (article, book, ...), and a map of named string
//! fields. A [`Library`] is an ordered collection of entries. The library
//! is owned and mutated by the surrounding application; this crate is the
//! read-only data model the search core operates on.

#![warn(missing_docs)]

mod entry;
mod id;

pub use entry::{Entry, Library};
pub use id::{EntryId, IdError};

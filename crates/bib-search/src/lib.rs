//! Query execution for bib.
//!
//! Applies a parsed [`bib_query::Query`] to an ordered slice of entries,
//! producing a [`MatchResult`]. Fulltext matching is delegated to an
//! external [`FulltextIndex`] collaborator when one is configured; a
//! failing or absent backend degrades to field-only matching and never
//! fails the query.

#![warn(missing_docs)]

mod error;
mod execute;
mod fulltext;
mod result;

pub use error::FulltextError;
pub use execute::Searcher;
pub use fulltext::FulltextIndex;
pub use result::MatchResult;

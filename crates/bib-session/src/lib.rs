//! Search-bar session control for bib.
//!
//! One [`SearchBar`] owns the state behind a live search field: the current
//! text and modifier flags, the debounce timer, and the last evaluation
//! outcome. Edits are cheap; the expensive parse-and-execute step runs at
//! most once per debounce window, off the session task, and stale results
//! from superseded edits are discarded before they can be published.
//!
//! The presentation layer consumes two watch channels: a
//! [`SearchSnapshot`] stream with count/description/validity for the bar
//! itself, and the process-wide active-query slot that other components
//! (results table, preview) subscribe to.

#![warn(missing_docs)]

mod controller;
mod session;
mod source;

pub use controller::{SEARCH_DELAY, SearchBar, SearchBarConfig};
pub use session::{SearchPhase, SearchSnapshot};
pub use source::EntrySource;

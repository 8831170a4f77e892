//! Session state and the published snapshot.

use std::sync::Arc;

use bib_query::{Description, ParseError, Query, SearchFlags, is_likely_valid};
use bib_search::MatchResult;

/// Lifecycle phase of a search session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// No text; the search is cleared.
    #[default]
    Idle,
    /// Text present, debounce timer running or evaluation in flight.
    Pending,
    /// The last parse-and-execute completed (successfully or with an error).
    Evaluated,
}

/// A point-in-time view of the session, published to the presentation
/// layer on every change.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    /// Current search text.
    pub text: String,
    /// Current modifier flags.
    pub flags: SearchFlags,
    /// Where the session is in its lifecycle.
    pub phase: SearchPhase,
    /// Keystroke-rate validity signal for the field decoration.
    pub valid: bool,
    /// Match count of the last successful evaluation.
    pub match_count: Option<usize>,
    /// Description of the last successfully parsed query.
    pub description: Option<Description>,
    /// User-facing message of the last parse failure.
    pub error: Option<String>,
}

impl SearchSnapshot {
    /// The cleared snapshot an idle session publishes.
    pub(crate) fn idle(flags: SearchFlags) -> Self {
        Self {
            text: String::new(),
            flags,
            phase: SearchPhase::Idle,
            valid: true,
            match_count: None,
            description: None,
            error: None,
        }
    }
}

/// Internal session state owned by the driver task.
#[derive(Debug, Default)]
pub(crate) struct Session {
    /// Current search text.
    pub(crate) text: String,
    /// Current modifier flags.
    pub(crate) flags: SearchFlags,
    /// The last successfully parsed query.
    pub(crate) query: Option<Arc<Query>>,
    /// The last evaluation's matches.
    pub(crate) result: Option<MatchResult>,
    /// Description of the last successfully parsed query.
    pub(crate) description: Option<Description>,
    /// The last parse failure.
    pub(crate) error: Option<ParseError>,
    /// Lifecycle phase.
    pub(crate) phase: SearchPhase,
    /// Bumped on every edit; stamps evaluations so superseded results can
    /// be discarded when they arrive late.
    pub(crate) generation: u64,
}

impl Session {
    /// Resets everything except flags and generation to the idle state.
    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.query = None;
        self.result = None;
        self.description = None;
        self.error = None;
        self.phase = SearchPhase::Idle;
    }

    /// Builds the publishable snapshot of the current state.
    pub(crate) fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            text: self.text.clone(),
            flags: self.flags,
            phase: self.phase,
            valid: self.error.is_none() && is_likely_valid(&self.text, self.flags),
            match_count: self.result.as_ref().map(MatchResult::count),
            description: self.description.clone(),
            error: self.error.as_ref().map(|e| e.format_with_context(&self.text)),
        }
    }
}

//! The search-bar controller.
//!
//! A single driver task owns the session state and serializes every
//! mutation: edits and flag toggles arrive as events, the debounce timer is
//! a single schedule-and-replace deadline, and evaluation outcomes come
//! back over a channel stamped with the generation they were started for.
//! An outcome whose generation no longer matches was superseded by a newer
//! edit and is dropped without being published.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Duration,
};

use bib_prefs::PrefsStore;
use bib_query::{Description, ParseError, Query, SearchFlags, describe, parse};
use bib_search::{MatchResult, Searcher};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, error, warn};

use crate::{
    session::{SearchPhase, SearchSnapshot, Session},
    source::EntrySource,
};

/// Delay between the last edit and evaluation.
pub const SEARCH_DELAY: Duration = Duration::from_millis(400);

/// Tunables for a search bar.
#[derive(Debug, Clone)]
pub struct SearchBarConfig {
    /// Delay between the last edit and evaluation.
    pub debounce: Duration,
}

impl Default for SearchBarConfig {
    fn default() -> Self {
        Self {
            debounce: SEARCH_DELAY,
        }
    }
}

/// Input events from the presentation layer.
#[derive(Debug)]
enum SearchEvent {
    /// The field text changed.
    TextChanged(String),
    /// The case-sensitivity toggle changed.
    CaseSensitiveToggled(bool),
    /// The regex toggle changed.
    RegexToggled(bool),
    /// The fulltext toggle changed.
    FulltextToggled(bool),
}

/// Result of one offloaded evaluation, stamped with its generation.
struct EvalOutcome {
    /// The generation the evaluation was started for.
    generation: u64,
    /// The parsed query, when parsing succeeded.
    query: Option<Arc<Query>>,
    /// The matches, when parsing succeeded.
    result: Option<MatchResult>,
    /// The query description, when parsing succeeded.
    description: Option<Description>,
    /// The parse failure, otherwise.
    error: Option<ParseError>,
}

/// Handle to a running search-bar session.
///
/// Dropping the handle shuts the driver task down; use
/// [`SearchBar::shutdown`] to wait for it.
pub struct SearchBar {
    /// Event channel into the driver task.
    events: mpsc::UnboundedSender<SearchEvent>,
    /// Published session snapshots.
    state: watch::Receiver<SearchSnapshot>,
    /// The process-wide active-query slot.
    active: watch::Receiver<Option<Arc<Query>>>,
    /// The driver task.
    task: JoinHandle<()>,
}

impl SearchBar {
    /// Spawns a search-bar session over the given entry source.
    ///
    /// Flag defaults are read from the preference store when one is
    /// supplied; a failing store logs a warning and starts from the flag
    /// defaults.
    pub fn spawn(
        source: Arc<dyn EntrySource>,
        searcher: Searcher,
        prefs: Option<PrefsStore>,
        config: SearchBarConfig,
    ) -> Self {
        let flags = match &prefs {
            Some(store) => store.load().unwrap_or_else(|err| {
                warn!("could not load search preferences: {err}");
                SearchFlags::new()
            }),
            None => SearchFlags::new(),
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchSnapshot::idle(flags));
        let (active_tx, active_rx) = watch::channel(None);

        let driver = Driver {
            source,
            searcher,
            prefs,
            debounce: config.debounce,
            session: Session {
                flags,
                ..Session::default()
            },
            state_tx,
            active_tx,
            outcome_tx,
        };

        let task = tokio::spawn(driver.run(events_rx, outcome_rx));

        Self {
            events: events_tx,
            state: state_rx,
            active: active_rx,
            task,
        }
    }

    /// Reports an edit of the field text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.send(SearchEvent::TextChanged(text.into()));
    }

    /// Toggles case-sensitive matching.
    pub fn set_case_sensitive(&self, on: bool) {
        self.send(SearchEvent::CaseSensitiveToggled(on));
    }

    /// Toggles regular-expression interpretation.
    pub fn set_regex(&self, on: bool) {
        self.send(SearchEvent::RegexToggled(on));
    }

    /// Toggles fulltext matching.
    pub fn set_fulltext(&self, on: bool) {
        self.send(SearchEvent::FulltextToggled(on));
    }

    /// Subscribes to session snapshots.
    pub fn state(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.clone()
    }

    /// The current session snapshot.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribes to the shared active-query slot.
    ///
    /// The slot has last-writer-wins semantics: consumers observe the most
    /// recent query, not a history.
    pub fn active_query(&self) -> watch::Receiver<Option<Arc<Query>>> {
        self.active.clone()
    }

    /// Shuts the session down and waits for the driver task to finish.
    pub async fn shutdown(self) {
        let Self { events, task, .. } = self;
        drop(events);
        task.await.ok();
    }

    /// Sends an event to the driver, ignoring a closed channel.
    fn send(&self, event: SearchEvent) {
        self.events.send(event).ok();
    }
}

/// The driver task: sole owner and mutator of the session state.
struct Driver {
    /// Entry collection snapshots for evaluations.
    source: Arc<dyn EntrySource>,
    /// Executes parsed queries.
    searcher: Searcher,
    /// Flag persistence, written on every toggle.
    prefs: Option<PrefsStore>,
    /// Delay between the last edit and evaluation.
    debounce: Duration,
    /// The session state.
    session: Session,
    /// Snapshot publisher.
    state_tx: watch::Sender<SearchSnapshot>,
    /// Active-query publisher.
    active_tx: watch::Sender<Option<Arc<Query>>>,
    /// Channel evaluations report back on.
    outcome_tx: mpsc::UnboundedSender<EvalOutcome>,
}

impl Driver {
    /// Runs the event loop until the event channel closes.
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<SearchEvent>,
        mut outcomes: mpsc::UnboundedReceiver<EvalOutcome>,
    ) {
        // At most one pending deadline; every edit replaces it
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event, &mut deadline);
                }
                Some(outcome) = outcomes.recv() => {
                    self.publish_outcome(outcome);
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    self.begin_evaluation();
                }
            }
        }
    }

    /// Applies one input event to the session.
    fn handle_event(&mut self, event: SearchEvent, deadline: &mut Option<Instant>) {
        // Every edit supersedes any evaluation still in flight
        self.session.generation += 1;

        match event {
            SearchEvent::TextChanged(text) => {
                if text.is_empty() {
                    // An empty search field clears the search
                    *deadline = None;
                    self.session.clear();
                    self.active_tx.send_replace(None);
                    self.publish_snapshot();
                    return;
                }

                self.session.text = text;
                self.session.error = None;
                self.session.phase = SearchPhase::Pending;
                self.publish_snapshot();
                *deadline = Some(Instant::now() + self.debounce);
            }

            SearchEvent::CaseSensitiveToggled(on) => {
                let flags = self.session.flags.with_case_sensitive(on);
                self.apply_flags(flags, deadline);
            }
            SearchEvent::RegexToggled(on) => {
                let flags = self.session.flags.with_regex(on);
                self.apply_flags(flags, deadline);
            }
            SearchEvent::FulltextToggled(on) => {
                let flags = self.session.flags.with_fulltext(on);
                self.apply_flags(flags, deadline);
            }
        }
    }

    /// Installs new flags, persists them, and re-evaluates immediately.
    ///
    /// Toggles are discrete user actions, so unlike typing they skip the
    /// debounce delay.
    fn apply_flags(&mut self, flags: SearchFlags, deadline: &mut Option<Instant>) {
        self.session.flags = flags;

        // Fire-and-forget persistence
        if let Some(store) = &self.prefs
            && let Err(err) = store.store(flags)
        {
            warn!("could not store search preferences: {err}");
        }

        if self.session.text.is_empty() {
            self.publish_snapshot();
            return;
        }

        *deadline = None;
        self.session.error = None;
        self.session.phase = SearchPhase::Pending;
        self.publish_snapshot();
        self.begin_evaluation();
    }

    /// Starts an offloaded evaluation for the current text and flags.
    fn begin_evaluation(&self) {
        let generation = self.session.generation;
        let text = self.session.text.clone();
        let flags = self.session.flags;
        let searcher = self.searcher.clone();
        let source = Arc::clone(&self.source);
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            // Evaluation faults must never take the session down: they are
            // contained here and reported as an illegal expression
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                evaluate(generation, &text, flags, &searcher, source.as_ref())
            }))
            .unwrap_or_else(|_| {
                error!("evaluation panicked for query {text:?}");
                EvalOutcome {
                    generation,
                    query: None,
                    result: None,
                    description: None,
                    error: Some(ParseError::MalformedGrammar {
                        position: 0,
                        message: "internal error while evaluating the search".into(),
                    }),
                }
            });

            outcome_tx.send(outcome).ok();
        });
    }

    /// Publishes a finished evaluation, unless it has been superseded.
    fn publish_outcome(&mut self, outcome: EvalOutcome) {
        if outcome.generation != self.session.generation {
            debug!(
                "discarding stale evaluation (generation {} != {})",
                outcome.generation, self.session.generation
            );
            return;
        }

        self.session.phase = SearchPhase::Evaluated;
        self.session.query = outcome.query;
        self.session.result = outcome.result;
        self.session.description = outcome.description;
        self.session.error = outcome.error;

        // Parse failures clear the shared slot, the same as an empty search
        self.active_tx.send_replace(self.session.query.clone());
        self.publish_snapshot();
    }

    /// Publishes the current session snapshot.
    fn publish_snapshot(&self) {
        self.state_tx.send_replace(self.session.snapshot());
    }
}

/// One full evaluation: parse, execute, describe.
///
/// Runs off the driver task; the result is delivered back over the outcome
/// channel and published only if still current.
fn evaluate(
    generation: u64,
    text: &str,
    flags: SearchFlags,
    searcher: &Searcher,
    source: &dyn EntrySource,
) -> EvalOutcome {
    match parse(text, flags) {
        Ok(query) => {
            let entries = source.entries();
            let result = searcher.execute(&query, &entries);
            let description = describe(&query);

            EvalOutcome {
                generation,
                query: Some(Arc::new(query)),
                result: Some(result),
                description: Some(description),
                error: None,
            }
        }
        Err(err) => {
            debug!("search text {text:?} did not parse: {err}");
            EvalOutcome {
                generation,
                query: None,
                result: None,
                description: None,
                error: Some(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bib_entry::{Entry, EntryId, Library};
    use bib_query::QueryMode;
    use tokio::time::{advance, timeout};

    use super::*;
    use crate::session::SearchPhase;

    /// An entry source that counts how often it is snapshotted, i.e. how
    /// many evaluations actually ran.
    struct CountingSource {
        /// The underlying library.
        library: Library,
        /// Number of snapshots taken.
        reads: AtomicUsize,
    }

    impl CountingSource {
        fn new(library: Library) -> Arc<Self> {
            Arc::new(Self {
                library,
                reads: AtomicUsize::new(0),
            })
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl EntrySource for CountingSource {
        fn entries(&self) -> Vec<Entry> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.library.entries().to_vec()
        }
    }

    fn entry(key: &str, author: &str) -> Entry {
        Entry::new(EntryId::new(key).unwrap(), "article").with_field("author", author)
    }

    fn small_library() -> Library {
        vec![entry("Smith2020", "Smith"), entry("Jones2019", "Jones")].into()
    }

    fn spawn_bar(source: Arc<CountingSource>) -> SearchBar {
        SearchBar::spawn(
            source,
            Searcher::new(),
            None,
            SearchBarConfig::default(),
        )
    }

    /// Waits until the published snapshot satisfies the predicate.
    async fn wait_for(
        rx: &mut watch::Receiver<SearchSnapshot>,
        pred: impl Fn(&SearchSnapshot) -> bool,
    ) -> SearchSnapshot {
        let result = timeout(Duration::from_secs(60), async {
            loop {
                {
                    let snap = rx.borrow_and_update();
                    if pred(&snap) {
                        return snap.clone();
                    }
                }
                rx.changed().await.expect("search bar dropped");
            }
        })
        .await;
        result.expect("snapshot condition not reached")
    }

    /// Lets the driver and evaluation tasks run without advancing time.
    async fn settle() {
        for _ in 0..32 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn three_rapid_edits_evaluate_once_with_final_text() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();

        bar.set_text("s");
        bar.set_text("sm");
        bar.set_text("smith");

        let snap = wait_for(&mut state, |s| s.phase == SearchPhase::Evaluated).await;

        assert_eq!(source.reads(), 1);
        assert_eq!(snap.text, "smith");
        assert_eq!(snap.match_count, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn evaluation_waits_for_the_debounce_window() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));

        bar.set_text("smith");
        settle().await;

        advance(SEARCH_DELAY - Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(source.reads(), 0);
        assert_eq!(bar.snapshot().phase, SearchPhase::Pending);

        advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(source.reads(), 1);
        assert_eq!(bar.snapshot().phase, SearchPhase::Evaluated);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_clears_without_evaluating() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();
        let active = bar.active_query();

        bar.set_text("smith");
        wait_for(&mut state, |s| s.phase == SearchPhase::Evaluated).await;
        assert!(active.borrow().is_some());

        bar.set_text("");
        let snap = wait_for(&mut state, |s| s.phase == SearchPhase::Idle).await;

        assert_eq!(snap.match_count, None);
        assert!(snap.description.is_none());
        assert!(snap.error.is_none());
        assert!(snap.valid);
        assert!(active.borrow().is_none());
        // Clearing performed no extra evaluation
        assert_eq!(source.reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flag_toggle_reevaluates_without_debounce() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();

        bar.set_text("SMITH");
        wait_for(&mut state, |s| s.phase == SearchPhase::Evaluated).await;
        assert_eq!(bar.snapshot().match_count, Some(1));

        bar.set_case_sensitive(true);
        // No time is advanced: the toggle must evaluate on its own
        settle().await;

        let snap = bar.snapshot();
        assert_eq!(snap.phase, SearchPhase::Evaluated);
        assert!(snap.flags.case_sensitive());
        assert_eq!(snap.match_count, Some(0));
        assert_eq!(source.reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_regex_reports_error_and_clears_active_query() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();
        let active = bar.active_query();

        bar.set_regex(true);
        bar.set_text("(");

        let snap = wait_for(&mut state, |s| {
            s.phase == SearchPhase::Evaluated && s.error.is_some()
        })
        .await;

        assert!(!snap.valid);
        assert_eq!(snap.match_count, None);
        assert!(snap.error.as_deref().is_some_and(|e| e.contains("regular expression")));
        assert!(active.borrow().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn session_recovers_after_a_parse_error() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();

        bar.set_text("author=");
        let snap = wait_for(&mut state, |s| s.error.is_some()).await;
        assert!(snap.error.as_deref().is_some_and(|e| e.contains("expected a value")));

        bar.set_text("smith");
        let snap = wait_for(&mut state, |s| {
            s.phase == SearchPhase::Evaluated && s.error.is_none()
        })
        .await;
        assert_eq!(snap.match_count, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn newest_edit_wins_over_in_flight_evaluation() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();

        bar.set_text("smith");
        settle().await;
        advance(SEARCH_DELAY).await;
        // The evaluation for "smith" may now be in flight; supersede it
        bar.set_text("jones");

        let snap = wait_for(&mut state, |s| {
            s.phase == SearchPhase::Evaluated && s.text == "jones"
        })
        .await;
        assert_eq!(snap.match_count, Some(1));

        // Whatever happened to the first evaluation, the published state
        // belongs to the latest edit
        let active = bar.active_query();
        let query = active.borrow().clone().expect("active query");
        assert_eq!(query.text(), "jones");
    }

    #[tokio::test(start_paused = true)]
    async fn active_query_carries_the_parsed_mode() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(Arc::clone(&source));
        let mut state = bar.state();

        bar.set_text("author=smith and author=jones");
        wait_for(&mut state, |s| s.phase == SearchPhase::Evaluated).await;

        let active = bar.active_query();
        let query = active.borrow().clone().expect("active query");
        assert_eq!(query.mode(), QueryMode::Grammar);
        assert_eq!(bar.snapshot().match_count, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn prefs_supply_initial_flags_and_record_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::with_path(dir.path().join(".bib.toml"));
        store
            .store(SearchFlags::new().with_case_sensitive(true))
            .unwrap();

        let source = CountingSource::new(small_library());
        let bar = SearchBar::spawn(
            source,
            Searcher::new(),
            Some(store.clone()),
            SearchBarConfig::default(),
        );

        assert!(bar.snapshot().flags.case_sensitive());

        bar.set_fulltext(true);
        settle().await;

        let persisted = store.load().unwrap();
        assert!(persisted.case_sensitive());
        assert!(persisted.fulltext());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_driver() {
        let source = CountingSource::new(small_library());
        let bar = spawn_bar(source);
        bar.shutdown().await;
    }
}

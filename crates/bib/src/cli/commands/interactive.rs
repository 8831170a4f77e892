//! Implementation of `bib interactive`.
//!
//! A line-oriented stand-in for the search bar: every input line becomes
//! the current search text, runs through the same debounced session the
//! graphical bar uses, and prints the count and interpretation once the
//! evaluation settles.

use std::{
    io::{self, BufRead},
    process::ExitCode,
    sync::Arc,
};

use bib_entry::Library;
use bib_search::Searcher;
use bib_session::{SearchBar, SearchBarConfig, SearchPhase, SearchSnapshot};
use tokio::sync::watch;

use super::shared::{load_library, open_prefs};
use crate::cli::{args::InteractiveCommand, output};

/// Runs the interactive search loop over stdin.
pub fn run(cmd: &InteractiveCommand) -> ExitCode {
    let library = match load_library(&cmd.library) {
        Ok(library) => library,
        Err(code) => return code,
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(drive(cmd, library))
}

/// Feeds stdin lines through a search-bar session.
async fn drive(cmd: &InteractiveCommand, library: Library) -> ExitCode {
    let prefs = if cmd.modifiers.no_prefs {
        None
    } else {
        open_prefs()
    };

    let bar = SearchBar::spawn(
        Arc::new(library),
        Searcher::new(),
        prefs,
        SearchBarConfig::default(),
    );

    if cmd.modifiers.case_sensitive {
        bar.set_case_sensitive(true);
    }
    if cmd.modifiers.regex {
        bar.set_regex(true);
    }
    if cmd.modifiers.fulltext {
        bar.set_fulltext(true);
    }

    let mut state = bar.state();

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        };

        bar.set_text(line.clone());
        let snapshot = wait_settled(&mut state, &line).await;
        print_outcome(&snapshot);
    }

    bar.shutdown().await;
    ExitCode::SUCCESS
}

/// Waits until the session has settled for the given text.
async fn wait_settled(state: &mut watch::Receiver<SearchSnapshot>, text: &str) -> SearchSnapshot {
    loop {
        {
            let snapshot = state.borrow_and_update();
            let settled = match snapshot.phase {
                SearchPhase::Idle => text.is_empty(),
                SearchPhase::Evaluated => snapshot.text == text,
                SearchPhase::Pending => false,
            };
            if settled {
                return snapshot.clone();
            }
        }

        if state.changed().await.is_err() {
            // Session gone; report whatever we last saw
            return state.borrow().clone();
        }
    }
}

/// Prints one settled evaluation.
fn print_outcome(snapshot: &SearchSnapshot) {
    if snapshot.phase == SearchPhase::Idle {
        println!("(cleared)");
        return;
    }

    if let Some(error) = &snapshot.error {
        println!("Search failed: illegal search expression");
        eprintln!("{error}");
        return;
    }

    let count = snapshot.match_count.unwrap_or(0);
    let description = snapshot
        .description
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    println!("{} | {description}", output::count_line(count));
}

//! Helpers shared by the query-taking commands.

use std::{fs, path::Path, process::ExitCode};

use bib_entry::Library;
use bib_prefs::PrefsStore;
use bib_query::SearchFlags;
use tracing::warn;

use crate::cli::args::ModifierArgs;

/// Resolves the effective search flags for a command.
///
/// Persisted preferences supply the defaults (unless `--no-prefs`); each
/// command-line modifier switches its flag on in addition.
pub(super) fn resolve_flags(modifiers: &ModifierArgs) -> SearchFlags {
    let defaults = if modifiers.no_prefs {
        SearchFlags::new()
    } else {
        load_pref_defaults()
    };

    let mut flags = defaults;
    if modifiers.case_sensitive {
        flags = flags.with_case_sensitive(true);
    }
    if modifiers.regex {
        flags = flags.with_regex(true);
    }
    if modifiers.fulltext {
        flags = flags.with_fulltext(true);
    }
    flags
}

/// Loads flag defaults from the preference store, tolerating failure.
fn load_pref_defaults() -> SearchFlags {
    let store = match PrefsStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            warn!("could not locate search preferences: {err}");
            return SearchFlags::new();
        }
    };

    store.load().unwrap_or_else(|err| {
        warn!("could not load search preferences: {err}");
        SearchFlags::new()
    })
}

/// Opens the preference store for the interactive session, tolerating failure.
pub(super) fn open_prefs() -> Option<PrefsStore> {
    match PrefsStore::open_default() {
        Ok(store) => Some(store),
        Err(err) => {
            warn!("could not locate search preferences: {err}");
            None
        }
    }
}

/// Loads a JSON library file.
pub(super) fn load_library(path: &Path) -> Result<Library, ExitCode> {
    let contents = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read library file {}: {e}", path.display());
        ExitCode::FAILURE
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        eprintln!("error: failed to parse library file {}: {e}", path.display());
        ExitCode::FAILURE
    })
}

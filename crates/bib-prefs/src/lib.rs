//! Search preference persistence for bib.
//!
//! The search bar's modifier flags survive restarts: they are read from
//! `~/.bib.toml` when a session starts and written back whenever the user
//! toggles a modifier. Writes are fire-and-forget from the session's point
//! of view; a failing store never breaks searching.

#![warn(missing_docs)]

mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use bib_query::SearchFlags;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

pub use error::PrefsError;

/// The preferences filename in the home directory.
pub const PREFS_FILENAME: &str = ".bib.toml";

/// Raw preferences as stored on disk.
///
/// All fields are optional so partial or older files still load; missing
/// keys fall back to the flag defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawPrefs {
    /// Persisted search section.
    search: RawSearchPrefs,
}

/// Raw search-flag settings from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawSearchPrefs {
    /// Literal comparisons honor letter case.
    case_sensitive: Option<bool>,
    /// Query text is a regular expression.
    regex: Option<bool>,
    /// Matching extends to linked-file content.
    fulltext: Option<bool>,
}

impl RawSearchPrefs {
    /// Resolves the raw settings into flags, defaulting missing keys.
    fn to_flags(&self) -> SearchFlags {
        SearchFlags::new()
            .with_case_sensitive(self.case_sensitive.unwrap_or(false))
            .with_regex(self.regex.unwrap_or(false))
            .with_fulltext(self.fulltext.unwrap_or(false))
    }

    /// Builds the raw settings from flags.
    fn from_flags(flags: SearchFlags) -> Self {
        Self {
            case_sensitive: Some(flags.case_sensitive()),
            regex: Some(flags.regex()),
            fulltext: Some(flags.fulltext()),
        }
    }
}

/// Loads and stores the search flags at a fixed path.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    /// Path of the preferences file.
    path: PathBuf,
}

impl PrefsStore {
    /// Opens the store at the default location (`~/.bib.toml`).
    pub fn open_default() -> Result<Self, PrefsError> {
        let base = BaseDirs::new().ok_or(PrefsError::NoHomeDirectory)?;
        Ok(Self::with_path(base.home_dir().join(PREFS_FILENAME)))
    }

    /// Opens the store at an explicit path (primarily for tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the preferences file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted flags.
    ///
    /// A missing file is not an error: it yields the flag defaults.
    pub fn load(&self) -> Result<SearchFlags, PrefsError> {
        if !self.path.is_file() {
            return Ok(SearchFlags::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| PrefsError::ReadFile {
            path: self.path.clone(),
            source,
        })?;

        let raw: RawPrefs =
            toml::from_str(&contents).map_err(|source| PrefsError::ParseToml {
                path: self.path.clone(),
                source,
            })?;

        Ok(raw.search.to_flags())
    }

    /// Persists the given flags, replacing the file contents.
    pub fn store(&self, flags: SearchFlags) -> Result<(), PrefsError> {
        let raw = RawPrefs {
            search: RawSearchPrefs::from_flags(flags),
        };

        // RawPrefs has no non-serializable values, so this cannot fail
        let contents = toml::to_string_pretty(&raw).unwrap_or_default();

        fs::write(&self.path, contents).map_err(|source| PrefsError::WriteFile {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PrefsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::with_path(dir.path().join(PREFS_FILENAME));
        (dir, store)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load().unwrap(), SearchFlags::new());
    }

    #[test]
    fn store_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let flags = SearchFlags::new().with_regex(true).with_fulltext(true);

        store.store(flags).unwrap();
        assert_eq!(store.load().unwrap(), flags);
    }

    #[test]
    fn partial_file_defaults_missing_keys() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "[search]\ncase_sensitive = true\n").unwrap();

        let flags = store.load().unwrap();
        assert!(flags.case_sensitive());
        assert!(!flags.regex());
        assert!(!flags.fulltext());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "search = \"nope").unwrap();

        assert!(matches!(
            store.load(),
            Err(PrefsError::ParseToml { .. })
        ));
    }

    #[test]
    fn store_overwrites_previous_contents() {
        let (_dir, store) = temp_store();
        store.store(SearchFlags::new().with_regex(true)).unwrap();
        store.store(SearchFlags::new()).unwrap();

        assert_eq!(store.load().unwrap(), SearchFlags::new());
    }
}

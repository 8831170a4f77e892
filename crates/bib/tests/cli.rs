//! CLI integration tests for bib commands.
//!
//! These tests focus on exit codes and the user-visible result/error
//! wording, not on exact table formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

/// A small two-entry library in the JSON format `bib search` reads.
const LIBRARY_JSON: &str = r#"[
  {
    "id": "Smith2020",
    "type": "article",
    "fields": {
      "author": "Smith, John",
      "title": "Principles of Electrical Engineering",
      "year": "2020"
    }
  },
  {
    "id": "Jones2019",
    "type": "book",
    "fields": {
      "author": "Jones, Mary",
      "title": "Organic Chemistry",
      "year": "2019"
    }
  }
]"#;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Writes the fixture library into the directory.
fn write_library(dir: &Path) -> PathBuf {
    let path = dir.join("library.json");
    fs::write(&path, LIBRARY_JSON).unwrap();
    path
}

/// Helper to get a bib command with HOME isolated to the given directory,
/// so persisted preferences never leak between tests.
fn bib(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bib").unwrap();
    cmd.env("HOME", home);
    cmd
}

mod search {
    use super::*;

    #[test]
    fn finds_matching_entries() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["search", "smith", "--library"])
            .arg(&library)
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 1 result."))
            .stdout(predicate::str::contains("Smith2020"));
    }

    #[test]
    fn reports_no_results() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["search", "zirconium", "--library"])
            .arg(&library)
            .assert()
            .success()
            .stdout(predicate::str::contains("No results found."));
    }

    #[test]
    fn grammar_query_combines_fields() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["search", "author=Smith and title=electrical", "--library"])
            .arg(&library)
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 1 result."))
            .stdout(predicate::str::contains(
                "Interpreted as: author = Smith and title = electrical",
            ));
    }

    #[test]
    fn json_output_lists_matches() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        let output = bib(dir.path())
            .args(["search", "jones", "--json", "--library"])
            .arg(&library)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["match_count"], 1);
        assert_eq!(parsed["mode"], "plain");
        assert_eq!(parsed["matches"][0], "Jones2019");
    }

    #[test]
    fn invalid_regex_fails() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["search", "--regex", "(", "--library"])
            .arg(&library)
            .assert()
            .failure()
            .stderr(predicate::str::contains("illegal search expression"))
            .stderr(predicate::str::contains("invalid regular expression"));
    }

    #[test]
    fn malformed_grammar_fails_with_position() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["search", "author=", "--library"])
            .arg(&library)
            .assert()
            .failure()
            .stderr(predicate::str::contains("illegal search expression"))
            .stderr(predicate::str::contains("^"));
    }

    #[test]
    fn explain_shows_mode_and_tree() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["search", "--explain", "author=smith or year=2019", "--library"])
            .arg(&library)
            .assert()
            .success()
            .stdout(predicate::str::contains("Mode: grammar"))
            .stdout(predicate::str::contains("Or"))
            .stdout(predicate::str::contains("Leaf(author"));
    }

    #[test]
    fn missing_library_file_fails() {
        let dir = temp_dir();

        bib(dir.path())
            .args(["search", "smith", "--library"])
            .arg(dir.path().join("nope.json"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read library file"));
    }
}

mod check {
    use super::*;

    #[test]
    fn accepts_plain_text() {
        let dir = temp_dir();

        bib(dir.path())
            .args(["check", "smith (ed.)"])
            .assert()
            .success()
            .stdout(predicate::str::contains("OK (plain mode)"));
    }

    #[test]
    fn accepts_grammar_query() {
        let dir = temp_dir();

        bib(dir.path())
            .args(["check", "author=smith and not year=2019"])
            .assert()
            .success()
            .stdout(predicate::str::contains("OK (grammar mode)"));
    }

    #[test]
    fn rejects_invalid_regex() {
        let dir = temp_dir();

        bib(dir.path())
            .args(["check", "--regex", "("])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid regular expression"));
    }

    #[test]
    fn prefs_supply_flag_defaults() {
        let dir = temp_dir();
        fs::write(dir.path().join(".bib.toml"), "[search]\nregex = true\n").unwrap();

        // With persisted regex mode, "(" is an invalid pattern
        bib(dir.path()).args(["check", "("]).assert().failure();

        // --no-prefs ignores the persisted flags, so it is literal text
        bib(dir.path())
            .args(["check", "--no-prefs", "("])
            .assert()
            .success()
            .stdout(predicate::str::contains("OK (plain mode)"));
    }
}

mod interactive {
    use super::*;

    #[test]
    fn evaluates_each_line() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["interactive", "--library"])
            .arg(&library)
            .write_stdin("smith\nauthor=\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 1 result."))
            .stdout(predicate::str::contains("illegal search expression"));
    }

    #[test]
    fn empty_line_clears_the_search() {
        let dir = temp_dir();
        let library = write_library(dir.path());

        bib(dir.path())
            .args(["interactive", "--library"])
            .arg(&library)
            .write_stdin("jones\n\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 1 result."))
            .stdout(predicate::str::contains("(cleared)"));
    }
}

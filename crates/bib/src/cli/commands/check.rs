//! Implementation of `bib check`.

use std::process::ExitCode;

use bib_query::{describe, is_likely_valid, parse};

use super::shared::resolve_flags;
use crate::cli::args::CheckCommand;

/// Checks query syntax without searching.
///
/// Runs the same keystroke-rate validity check the search bar uses, then a
/// full parse, and reports how the query would be interpreted.
pub fn run(cmd: &CheckCommand) -> ExitCode {
    let flags = resolve_flags(&cmd.modifiers);

    if !is_likely_valid(&cmd.query, flags) {
        eprintln!("Invalid regular expression");
        return ExitCode::FAILURE;
    }

    match parse(&cmd.query, flags) {
        Ok(query) => {
            println!("OK ({} mode): {}", query.mode(), describe(&query));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Search failed: illegal search expression");
            eprintln!("{}", err.format_with_context(&cmd.query));
            ExitCode::FAILURE
        }
    }
}

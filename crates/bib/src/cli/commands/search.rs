//! Implementation of `bib search`.

use std::process::ExitCode;

use bib_query::{describe, parse};
use bib_search::Searcher;

use super::shared::{load_library, resolve_flags};
use crate::cli::{args::SearchCommand, output};

/// Searches a library file and prints the matches.
pub fn run(cmd: &SearchCommand) -> ExitCode {
    let flags = resolve_flags(&cmd.modifiers);

    let library = match load_library(&cmd.library) {
        Ok(library) => library,
        Err(code) => return code,
    };

    let query = match parse(&cmd.query, flags) {
        Ok(query) => query,
        Err(err) => {
            eprintln!("Search failed: illegal search expression");
            eprintln!("{}", err.format_with_context(&cmd.query));
            return ExitCode::FAILURE;
        }
    };

    if cmd.explain {
        println!("Query: {}", query.text());
        println!("Mode: {}", query.mode());
        println!("Interpreted as: {}", describe(&query));

        if let Some(expr) = query.expr() {
            println!();
            println!("Parsed tree:");
            for line in expr.to_string().lines() {
                println!("   {line}");
            }
        }

        return ExitCode::SUCCESS;
    }

    let searcher = Searcher::new();
    let result = searcher.execute(&query, library.entries());

    output::print_results(&library, &query, &result, cmd.json)
}

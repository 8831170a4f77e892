//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use bib_entry::Library;
use bib_query::{Query, describe};
use bib_search::MatchResult;
use comfy_table::{Table, presets::UTF8_FULL};
use serde::Serialize;

/// JSON output for `bib search`.
#[derive(Serialize)]
struct JsonSearchOutput {
    /// The original query string.
    query: String,
    /// Which interpretation path produced the query.
    mode: String,
    /// Plain-text rendering of the query description.
    description: String,
    /// Total matches.
    match_count: usize,
    /// Citation keys of the matches, in library order.
    matches: Vec<String>,
}

/// The result-count line, in the wording of the search bar.
pub fn count_line(count: usize) -> String {
    match count {
        0 => "No results found.".to_string(),
        1 => "Found 1 result.".to_string(),
        n => format!("Found {n} results."),
    }
}

/// Prints search results as JSON or as a human-readable table.
pub fn print_results(
    library: &Library,
    query: &Query,
    result: &MatchResult,
    json: bool,
) -> ExitCode {
    let description = describe(query);

    if json {
        let output = JsonSearchOutput {
            query: query.text().to_string(),
            mode: query.mode().to_string(),
            description: description.to_plain_text(),
            match_count: result.count(),
            matches: result.matched().iter().map(ToString::to_string).collect(),
        };

        match serde_json::to_string_pretty(&output) {
            Ok(json_str) => println!("{json_str}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("{}", count_line(result.count()));
    println!("Interpreted as: {description}");

    if !result.is_empty() {
        println!();
        println!("{}", matches_table(library, result));
    }

    ExitCode::SUCCESS
}

/// Builds the table of matched entries.
fn matches_table(library: &Library, result: &MatchResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(["Key", "Author", "Title", "Year"]);

    for id in result.matched() {
        let Some(entry) = library.get(id) else {
            continue;
        };
        table.add_row([
            entry.id.as_str(),
            entry.field("author").unwrap_or(""),
            entry.field("title").unwrap_or(""),
            entry.field("year").unwrap_or(""),
        ]);
    }

    table
}

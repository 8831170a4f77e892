//! Clap argument definitions for the `bib` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "bib")]
#[command(about = "Search core for bibliographic libraries")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Search modifier flags shared by query-taking commands.
///
/// Each flag turns a modifier on in addition to whatever the persisted
/// preferences enable.
#[derive(Args, Debug, Clone, Default)]
pub struct ModifierArgs {
    /// Match case-sensitively
    #[arg(short = 'c', long)]
    pub case_sensitive: bool,

    /// Interpret the query as a regular expression
    #[arg(short = 'r', long)]
    pub regex: bool,

    /// Extend matching to indexed linked-file content
    #[arg(short = 'f', long)]
    pub fulltext: bool,

    /// Ignore persisted search preferences
    #[arg(long)]
    pub no_prefs: bool,
}

/// Arguments for `bib search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Search query
    pub query: String,

    /// JSON library file to search
    #[arg(short = 'l', long)]
    pub library: PathBuf,

    #[command(flatten)]
    /// Search modifier flags.
    pub modifiers: ModifierArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show how the query was interpreted without searching
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `bib check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Query to check
    pub query: String,

    #[command(flatten)]
    /// Search modifier flags.
    pub modifiers: ModifierArgs,
}

/// Arguments for `bib interactive`.
#[derive(Args, Debug, Clone)]
pub struct InteractiveCommand {
    /// JSON library file to search
    #[arg(short = 'l', long)]
    pub library: PathBuf,

    #[command(flatten)]
    /// Search modifier flags.
    pub modifiers: ModifierArgs,
}

/// Supported `bib` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search a library file and report the matches
    #[command(after_help = "\
QUERY SYNTAX:
  term                  Single term matched against all fields
  author = smith        Field contains value
  author == smith       Field equals value exactly
  author != smith       Field does not contain value
  a and b  /  a b       Both must match
  a or b                Either must match
  not expr              Negation
  (expr)                Grouping
  \"exact phrase\"        Phrase value in comparisons

EXAMPLES:
  bib search smith --library refs.json
  bib search 'author=Smith and title=electrical' --library refs.json
  bib search --regex 'Sm.th' --library refs.json
  bib search 'not (year=2019 or year=2020)' --library refs.json")]
    Search(SearchCommand),

    /// Check query syntax without searching
    Check(CheckCommand),

    /// Read queries line by line and search on every edit
    Interactive(InteractiveCommand),
}

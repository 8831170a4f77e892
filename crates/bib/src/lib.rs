//! bib: search core for bibliographic libraries.
//!
//! bib is the query engine behind a reference manager's search bar: it
//! parses plain terms, boolean/field expressions, and regular expressions,
//! validates input as it is typed, executes queries against an in-memory
//! library, and explains how each query was interpreted. The `bib` binary
//! drives the same pipeline headlessly against a JSON library file.

#![warn(missing_docs)]

pub mod cli;

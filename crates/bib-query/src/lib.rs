//! Search query interpretation for bib.
//!
//! This crate turns the raw text of the search bar, together with its
//! modifier flags, into an immutable [`Query`] value:
//!
//! - **Plain**: `smith` - the whole text as one literal term, matched
//!   against every field
//! - **Grammar**: `author = smith and title = electrical` - boolean/field
//!   expressions with `and`/`or`/`not`, parentheses, quoted phrases, and
//!   the comparison operators `=` (contains), `==` (exact), `!=` (does not
//!   contain)
//! - **Regex**: the text compiled as a regular expression when the regex
//!   flag is on
//!
//! Text with no recognizable operators is never rejected: it falls back to
//! a plain literal term. Text that does contain operators must parse, and
//! surfaces a [`ParseError`] otherwise.
//!
//! # Example
//!
//! ```
//! use bib_query::{SearchFlags, parse};
//!
//! let query = parse("author = smith and year = 2020", SearchFlags::default()).unwrap();
//! assert!(query.is_grammar_based());
//! ```

#![warn(missing_docs)]

mod ast;
mod describe;
mod error;
mod flags;
mod lexer;
mod parser;
mod query;
mod validate;

pub use ast::{BooleanOp, Comparison, ComparisonOp, Expr, FieldSpec};
pub use describe::{Description, Segment, SegmentStyle, describe};
pub use error::{LexError, ParseError};
pub use flags::SearchFlags;
pub use lexer::{Spanned, Token, tokenize};
pub use parser::parse;
pub use query::{Query, QueryKind, QueryMode};
pub use validate::is_likely_valid;

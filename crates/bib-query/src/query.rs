//! The parsed, immutable query value.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::{ast::Expr, error::ParseError, flags::SearchFlags};

/// Which interpretation path produced a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// The whole text as one literal term matched against all fields.
    Plain,
    /// A structured boolean/field expression.
    Grammar,
    /// The text compiled as a regular expression.
    Regex,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "plain",
            Self::Grammar => "grammar",
            Self::Regex => "regex",
        };
        write!(f, "{name}")
    }
}

/// Mode-specific payload of a query.
#[derive(Debug, Clone)]
pub enum QueryKind {
    /// One literal term, compiled to an escaped pattern for matching.
    Plain {
        /// Escaped-literal pattern honoring the case flag.
        pattern: Regex,
    },

    /// A boolean/field expression tree.
    Grammar {
        /// Root of the expression tree.
        expr: Expr,
    },

    /// A user-supplied regular expression.
    Regex {
        /// Compiled pattern honoring the case flag.
        pattern: Regex,
    },
}

/// A successfully parsed search query.
///
/// A `Query` can only be obtained through [`parse`](crate::parse): there is
/// no invalid-query value, and the compiled pattern (where one exists) is
/// owned by the query itself.
#[derive(Debug, Clone)]
pub struct Query {
    /// The raw text the query was parsed from.
    text: String,
    /// The flags the query was parsed under.
    flags: SearchFlags,
    /// Mode-specific payload.
    kind: QueryKind,
}

impl Query {
    /// Builds a plain-mode query from the whole text as one literal term.
    pub(crate) fn plain(text: &str, flags: SearchFlags) -> Result<Self, ParseError> {
        let pattern = compile_pattern(&regex::escape(text), flags)?;
        Ok(Self {
            text: text.to_string(),
            flags,
            kind: QueryKind::Plain { pattern },
        })
    }

    /// Builds a grammar-mode query from a parsed expression tree.
    pub(crate) fn grammar(text: &str, flags: SearchFlags, expr: Expr) -> Self {
        Self {
            text: text.to_string(),
            flags,
            kind: QueryKind::Grammar { expr },
        }
    }

    /// Builds a regex-mode query by compiling the text as a pattern.
    pub(crate) fn regex(text: &str, flags: SearchFlags) -> Result<Self, ParseError> {
        let pattern = compile_pattern(text, flags)?;
        Ok(Self {
            text: text.to_string(),
            flags,
            kind: QueryKind::Regex { pattern },
        })
    }

    /// The raw text the query was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The flags the query was parsed under.
    pub fn flags(&self) -> SearchFlags {
        self.flags
    }

    /// The mode-specific payload.
    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    /// Which interpretation path produced this query.
    pub fn mode(&self) -> QueryMode {
        match self.kind {
            QueryKind::Plain { .. } => QueryMode::Plain,
            QueryKind::Grammar { .. } => QueryMode::Grammar,
            QueryKind::Regex { .. } => QueryMode::Regex,
        }
    }

    /// Whether this query was parsed under the boolean/field grammar.
    pub fn is_grammar_based(&self) -> bool {
        self.mode() == QueryMode::Grammar
    }

    /// The expression tree, for grammar-mode queries.
    pub fn expr(&self) -> Option<&Expr> {
        match &self.kind {
            QueryKind::Grammar { expr } => Some(expr),
            QueryKind::Plain { .. } | QueryKind::Regex { .. } => None,
        }
    }
}

/// Compiles `text` as a regular expression honoring the case flag.
pub(crate) fn compile_pattern(text: &str, flags: SearchFlags) -> Result<Regex, ParseError> {
    RegexBuilder::new(text)
        .case_insensitive(!flags.case_sensitive())
        .build()
        .map_err(|err| ParseError::InvalidRegex {
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pattern_escapes_metacharacters() {
        let query = Query::plain("smith (ed.)", SearchFlags::default()).unwrap();
        let QueryKind::Plain { pattern } = query.kind() else {
            panic!("expected plain mode");
        };

        assert!(pattern.is_match("Smith (Ed.) 2nd printing"));
        assert!(!pattern.is_match("smith ed"));
    }

    #[test]
    fn case_flag_controls_pattern_compilation() {
        let insensitive = Query::plain("Smith", SearchFlags::default()).unwrap();
        let sensitive =
            Query::plain("Smith", SearchFlags::default().with_case_sensitive(true)).unwrap();

        let QueryKind::Plain { pattern } = insensitive.kind() else {
            panic!("expected plain mode");
        };
        assert!(pattern.is_match("SMITH"));

        let QueryKind::Plain { pattern } = sensitive.kind() else {
            panic!("expected plain mode");
        };
        assert!(!pattern.is_match("SMITH"));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let err = Query::regex("(", SearchFlags::default().with_regex(true)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRegex { .. }));
    }
}

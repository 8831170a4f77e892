//! Error types for query interpretation.

use thiserror::Error;

/// Lexer error with byte position information.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in the input where the error occurred.
    pub position: usize,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Errors from interpreting search text.
///
/// Plain literal text never produces an error: `MalformedGrammar` is only
/// surfaced when the text contains recognizable operators and fails to
/// parse, and `InvalidRegex` only when the regex flag is on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The regex flag is on but the text does not compile as a pattern.
    #[error("invalid regular expression: {message}")]
    InvalidRegex {
        /// Message from the regex compiler.
        message: String,
    },

    /// The text looks like a structured expression but does not parse.
    #[error("malformed search expression: {message}")]
    MalformedGrammar {
        /// Byte position in the input where parsing failed.
        position: usize,
        /// What the parser expected or found.
        message: String,
    },
}

impl ParseError {
    /// Formats the error with a caret indicator showing where in `input`
    /// the failure occurred.
    pub fn format_with_context(&self, input: &str) -> String {
        match self {
            Self::InvalidRegex { .. } => self.to_string(),
            Self::MalformedGrammar { position, .. } => {
                let clamped = (*position).min(input.len());
                format!("{self}\n  {input}\n  {}^", " ".repeat(clamped))
            }
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self::MalformedGrammar {
            position: err.position,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_error_context_points_at_offset() {
        let err = ParseError::MalformedGrammar {
            position: 7,
            message: "expected a value after '='".into(),
        };

        let display = err.format_with_context("author=");
        assert!(display.contains("expected a value"));
        assert!(display.contains("author="));
        assert!(display.ends_with("       ^"));
    }

    #[test]
    fn regex_error_has_no_caret() {
        let err = ParseError::InvalidRegex {
            message: "unclosed group".into(),
        };
        assert!(!err.format_with_context("(").contains('^'));
    }
}

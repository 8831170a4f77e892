//! Query lexer (tokenizer).
//!
//! Converts search text into a token stream for the grammar parser. Tokens
//! carry their byte offset so parse errors can point back into the input.

use std::{iter::Peekable, str::Chars};

use crate::{ast::ComparisonOp, error::LexError};

/// A token in the search grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word: a field name or a search value.
    Term(String),

    /// A quoted phrase (the quotes are stripped, content preserved).
    Phrase(String),

    /// The `and` keyword.
    And,

    /// The `or` keyword.
    Or,

    /// The `not` keyword.
    Not,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// A comparison operator: `=`, `==`, or `!=`.
    Compare(ComparisonOp),
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token itself.
    pub token: Token,
    /// Byte offset of the token's first character in the input.
    pub offset: usize,
}

/// Tokenizes a search string.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        while let Some(spanned) = self.next_token()? {
            tokens.push(spanned);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Result<Option<Spanned>, LexError> {
        self.skip_whitespace();

        let offset = self.position;
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '"' => self.read_phrase()?,
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '=' => {
                self.advance();
                if self.chars.peek() == Some(&'=') {
                    self.advance();
                    Token::Compare(ComparisonOp::Exact)
                } else {
                    Token::Compare(ComparisonOp::Contains)
                }
            }
            '!' => {
                self.advance();
                if self.chars.peek() == Some(&'=') {
                    self.advance();
                    Token::Compare(ComparisonOp::NotContains)
                } else {
                    return Err(LexError::new("expected '=' after '!'", offset));
                }
            }
            _ => self.read_word(),
        };

        Ok(Some(Spanned { token, offset }))
    }

    /// Reads a quoted phrase, consuming both quotes.
    fn read_phrase(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance(); // consume closing quote
                    return Ok(Token::Phrase(content));
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(LexError::new("unclosed quote", start));
                }
            }
        }
    }

    /// Reads a bare word, turning the boolean keywords into keyword tokens.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '=' | '!') {
                break;
            }
            word.push(ch);
            self.advance();
        }

        // Keywords are case-insensitive
        if word.eq_ignore_ascii_case("and") {
            Token::And
        } else if word.eq_ignore_ascii_case("or") {
            Token::Or
        } else if word.eq_ignore_ascii_case("not") {
            Token::Not
        } else {
            Token::Term(word)
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Convenience function to tokenize a search string.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

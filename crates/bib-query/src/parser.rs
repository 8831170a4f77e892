//! Query parser.
//!
//! Decides which interpretation a piece of search text gets, and parses the
//! boolean/field grammar by recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ("or" and_expr)*
//! and_expr   → unary (("and")? unary)*
//! unary      → "not" unary | primary
//! primary    → comparison | "(" or_expr ")"
//! comparison → atom (OP atom)?        ; atom = TERM | PHRASE
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Negation: `not`
//! 3. AND (implicit between adjacent operands, or explicit keyword)
//! 4. OR (explicit keyword)
//!
//! # Mode selection
//!
//! Text that contains no comparison operator and no boolean keyword is
//! never sent through the grammar: it becomes a plain literal term and
//! cannot fail. Once the text shows an operator or keyword, a grammar
//! failure is a hard [`ParseError::MalformedGrammar`] rather than a silent
//! fallback, so genuine mistakes with explicit operators are not masked.

use crate::{
    ast::{BooleanOp, ComparisonOp, Expr, FieldSpec},
    error::ParseError,
    flags::SearchFlags,
    lexer::{Spanned, Token, tokenize},
    query::Query,
};

/// Recursive descent parser for the boolean/field grammar.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Spanned>,
    /// Current position in the token stream.
    position: usize,
    /// Byte length of the original input, for end-of-input errors.
    input_len: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Spanned>, input_len: usize) -> Self {
        Self {
            tokens,
            position: 0,
            input_len,
        }
    }

    /// Parses the token stream into an expression tree.
    fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_or_expr()?;

        if let Some(spanned) = self.peek() {
            return Err(self.error_at(
                format!("unexpected {}", describe_token(&spanned.token)),
                spanned.offset,
            ));
        }

        Ok(expr)
    }

    /// Parses: or_expr → and_expr ("or" and_expr)*
    fn parse_or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance(); // consume or
            let right = self.parse_and_expr()?;
            left = Expr::binary(BooleanOp::Or, left, right);
        }

        Ok(left)
    }

    /// Parses: and_expr → unary (("and")? unary)*
    ///
    /// The keyword is optional: adjacent operands are joined by an implicit
    /// AND, folding left-associatively.
    fn parse_and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            if self.check(&Token::And) {
                self.advance(); // consume and
            } else if !self.can_start_unary() {
                break;
            }

            let right = self.parse_unary()?;
            left = Expr::binary(BooleanOp::And, left, right);
        }

        Ok(left)
    }

    /// Checks whether the current token can begin a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek().map(|s| &s.token),
            Some(Token::Term(_)) | Some(Token::Phrase(_)) | Some(Token::Not) | Some(Token::LParen)
        )
    }

    /// Parses: unary → "not" unary | primary
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Not) {
            self.advance(); // consume not
            let inner = self.parse_unary()?;
            return Ok(Expr::not(inner));
        }

        self.parse_primary()
    }

    /// Parses: primary → comparison | "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.peek().cloned() else {
            return Err(self.error_at("unexpected end of query", self.input_len));
        };

        match spanned.token {
            Token::Term(_) | Token::Phrase(_) => self.parse_comparison(),

            Token::LParen => {
                self.advance(); // consume (
                let inner = self.parse_or_expr()?;

                if !self.check(&Token::RParen) {
                    let offset = self.peek().map_or(self.input_len, |s| s.offset);
                    return Err(self.error_at("expected closing parenthesis", offset));
                }
                self.advance(); // consume )

                Ok(inner)
            }

            Token::RParen => {
                Err(self.error_at("unexpected closing parenthesis", spanned.offset))
            }

            Token::And | Token::Or => Err(self.error_at(
                format!(
                    "'{}' needs an expression before it",
                    describe_token(&spanned.token)
                ),
                spanned.offset,
            )),

            Token::Compare(op) => Err(self.error_at(
                format!("'{op}' needs a field name before it"),
                spanned.offset,
            )),

            // parse_unary consumes `not` before primary is reached
            Token::Not => Err(self.error_at("unexpected negation", spanned.offset)),
        }
    }

    /// Parses: comparison → atom (OP atom)?
    ///
    /// A lone atom is an any-field contains comparison; an atom followed by
    /// an operator is a field comparison, where the field name must be a
    /// bare word.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.peek().cloned() else {
            return Err(self.error_at("unexpected end of query", self.input_len));
        };

        match spanned.token {
            Token::Term(word) => {
                self.advance();

                if let Some(Token::Compare(op)) = self.peek().map(|s| s.token.clone()) {
                    self.advance(); // consume operator
                    let value = self.parse_value_atom(op)?;
                    return Ok(Expr::leaf(FieldSpec::named(&word), op, value));
                }

                Ok(Expr::leaf(FieldSpec::Any, ComparisonOp::Contains, word))
            }

            Token::Phrase(text) => {
                self.advance();

                if let Some(Spanned {
                    token: Token::Compare(_),
                    offset,
                }) = self.peek().cloned()
                {
                    return Err(self.error_at("field name must be a bare word", offset));
                }

                Ok(Expr::leaf(FieldSpec::Any, ComparisonOp::Contains, text))
            }

            _ => unreachable!("parse_comparison called on non-atom token"),
        }
    }

    /// Parses the value atom after a comparison operator.
    fn parse_value_atom(&mut self, op: ComparisonOp) -> Result<String, ParseError> {
        match self.peek().cloned() {
            Some(Spanned {
                token: Token::Term(word),
                ..
            }) => {
                self.advance();
                Ok(word)
            }
            Some(Spanned {
                token: Token::Phrase(text),
                ..
            }) => {
                self.advance();
                Ok(text)
            }
            other => {
                let offset = other.map_or(self.input_len, |s| s.offset);
                Err(self.error_at(format!("expected a value after '{op}'"), offset))
            }
        }
    }

    /// Builds a grammar error at a byte offset.
    fn error_at(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError::MalformedGrammar {
            position,
            message: message.into(),
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.position)
    }

    /// Checks whether the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek().is_some_and(|s| s.token == *token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Human-readable token name for error messages.
fn describe_token(token: &Token) -> String {
    match token {
        Token::Term(word) => format!("term '{word}'"),
        Token::Phrase(text) => format!("phrase \"{text}\""),
        Token::And => "and".to_string(),
        Token::Or => "or".to_string(),
        Token::Not => "not".to_string(),
        Token::LParen => "opening parenthesis".to_string(),
        Token::RParen => "closing parenthesis".to_string(),
        Token::Compare(op) => format!("'{op}'"),
    }
}

/// Whether a token stream contains structured-query syntax.
///
/// Comparison operators and boolean keywords commit the text to the
/// grammar; parentheses and quotes alone do not, since they are common in
/// literal bibliographic text.
fn has_grammar_syntax(tokens: &[Spanned]) -> bool {
    tokens.iter().any(|s| {
        matches!(
            s.token,
            Token::Compare(_) | Token::And | Token::Or | Token::Not
        )
    })
}

/// Parses search text under the given flags into a [`Query`].
///
/// The caller filters empty text (an empty search means "clear", not a
/// query). Mode selection:
///
/// - regex flag on: the text is compiled as a pattern, and a compile
///   failure is [`ParseError::InvalidRegex`]
/// - text with comparison operators or boolean keywords: parsed under the
///   grammar, and a failure is [`ParseError::MalformedGrammar`]
/// - anything else: a plain literal term, never rejected
pub fn parse(text: &str, flags: SearchFlags) -> Result<Query, ParseError> {
    if flags.regex() {
        return Query::regex(text, flags);
    }

    match tokenize(text) {
        Ok(tokens) if has_grammar_syntax(&tokens) => {
            let expr = Parser::new(tokens, text.len()).parse()?;
            Ok(Query::grammar(text, flags, expr))
        }
        Ok(_) => Query::plain(text, flags),
        // Lexing can only fail on an unclosed quote or a lone '!'. If the
        // text carries a field separator it was meant as a structured
        // query; otherwise it is literal text.
        Err(err) if text.contains('=') => Err(err.into()),
        Err(_) => Query::plain(text, flags),
    }
}

//! Human-readable query descriptions.
//!
//! Renders a parsed [`Query`] into an ordered sequence of styled text
//! segments for tooltip/hint display. Grammar-mode descriptions are
//! round-trip safe: feeding [`Description::to_plain_text`] back through the
//! parser reconstructs a semantically equivalent expression tree.

use std::fmt;

use crate::{
    ast::{BooleanOp, Comparison, ComparisonOp, Expr, FieldSpec},
    flags::SearchFlags,
    query::{Query, QueryKind},
};

/// How a description segment should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// Connective or explanatory text.
    Text,
    /// An emphasized field name.
    Field,
    /// An emphasized search value.
    Value,
}

/// One styled piece of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The segment text.
    pub text: String,
    /// How the segment should be rendered.
    pub style: SegmentStyle,
}

/// A structured explanation of what a query will match.
///
/// Purely descriptive: never contains executable content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    /// The styled segments in display order.
    segments: Vec<Segment>,
}

impl Description {
    /// The styled segments in display order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Concatenates all segments into unstyled text.
    pub fn to_plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Appends a connective-text segment.
    fn push_text(&mut self, text: impl Into<String>) {
        self.push(text, SegmentStyle::Text);
    }

    /// Appends a field-name segment.
    fn push_field(&mut self, text: impl Into<String>) {
        self.push(text, SegmentStyle::Field);
    }

    /// Appends a value segment.
    fn push_value(&mut self, text: impl Into<String>) {
        self.push(text, SegmentStyle::Value);
    }

    /// Appends a segment with the given style.
    fn push(&mut self, text: impl Into<String>, style: SegmentStyle) {
        self.segments.push(Segment {
            text: text.into(),
            style,
        });
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain_text())
    }
}

/// Produces a structured explanation of a parsed query.
///
/// Pure and deterministic; does not mutate the query.
pub fn describe(query: &Query) -> Description {
    let mut description = Description::default();

    match query.kind() {
        QueryKind::Plain { .. } => {
            if query.flags().fulltext() {
                description.push_text("any field or linked file content contains ");
            } else {
                description.push_text("any field contains ");
            }
            description.push_value(query.text());
            description.push_text(case_suffix(query.flags()));
        }
        QueryKind::Regex { .. } => {
            description.push_text("any field matches the regular expression ");
            description.push_value(query.text());
            description.push_text(case_suffix(query.flags()));
        }
        QueryKind::Grammar { expr } => {
            render_expr(expr, &mut description);
        }
    }

    description
}

/// Case-sensitivity wording for plain and regex descriptions.
fn case_suffix(flags: SearchFlags) -> &'static str {
    if flags.case_sensitive() {
        " (case sensitive)"
    } else {
        " (ignoring case)"
    }
}

/// Renders an expression tree into round-trip-safe segments.
fn render_expr(expr: &Expr, out: &mut Description) {
    match expr {
        Expr::Leaf(cmp) => render_leaf(cmp, out),
        Expr::Not(inner) => {
            out.push_text("not ");
            render_child(inner, out);
        }
        Expr::Binary { op, left, right } => {
            render_operand(left, *op, out);
            out.push_text(format!(" {op} "));
            render_operand(right, *op, out);
        }
    }
}

/// Renders a leaf comparison.
///
/// Any-field contains leaves render as the bare value; everything else
/// spells out the field and operator so the text re-parses to the same
/// comparison.
fn render_leaf(cmp: &Comparison, out: &mut Description) {
    match (&cmp.field, cmp.op) {
        (FieldSpec::Any, ComparisonOp::Contains) => {
            out.push_value(quote_if_needed(&cmp.value));
        }
        (FieldSpec::Any, op) => {
            out.push_field("any");
            out.push_text(format!(" {op} "));
            out.push_value(quote_if_needed(&cmp.value));
        }
        (FieldSpec::Named(name), op) => {
            out.push_field(name.clone());
            out.push_text(format!(" {op} "));
            out.push_value(quote_if_needed(&cmp.value));
        }
    }
}

/// Renders the operand of a binary node, parenthesizing children whose
/// operator differs from the parent's so precedence survives a re-parse.
fn render_operand(child: &Expr, parent: BooleanOp, out: &mut Description) {
    let needs_parens = matches!(child, Expr::Binary { op, .. } if *op != parent);
    render_grouped(child, needs_parens, out);
}

/// Renders the operand of a `not`, which must parenthesize any binary child.
fn render_child(child: &Expr, out: &mut Description) {
    let needs_parens = matches!(child, Expr::Binary { .. });
    render_grouped(child, needs_parens, out);
}

/// Renders a subexpression, optionally wrapped in parentheses.
fn render_grouped(expr: &Expr, parens: bool, out: &mut Description) {
    if parens {
        out.push_text("(");
    }
    render_expr(expr, out);
    if parens {
        out.push_text(")");
    }
}

/// Quotes a value when leaving it bare would change how it re-parses.
fn quote_if_needed(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.chars().any(|c| {
            c.is_whitespace() || matches!(c, '(' | ')' | '"' | '=' | '!')
        })
        || ["and", "or", "not"]
            .iter()
            .any(|kw| value.eq_ignore_ascii_case(kw));

    if needs_quotes {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

//! Query expression tree.
//!
//! Represents parsed boolean/field expressions before evaluation against an
//! entry collection.

use std::fmt;

/// Comparison operators for field leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// The field value contains the term (`=`).
    Contains,

    /// The field value equals the term exactly (`==`).
    Exact,

    /// The field value does not contain the term (`!=`).
    NotContains,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Contains => "=",
            Self::Exact => "==",
            Self::NotContains => "!=",
        };
        write!(f, "{symbol}")
    }
}

/// Boolean connectives for binary nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Both children must match.
    And,

    /// At least one child must match.
    Or,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::And => "and",
            Self::Or => "or",
        };
        write!(f, "{keyword}")
    }
}

/// The field a comparison applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// Match against every field of an entry.
    Any,

    /// Match against a single named field (e.g. `author`, `title`).
    Named(String),
}

impl FieldSpec {
    /// Builds a field spec from a field name as written in the query.
    ///
    /// The pseudo-fields `any` and `anyfield` select all fields.
    pub fn named(name: &str) -> Self {
        if name.eq_ignore_ascii_case("any") || name.eq_ignore_ascii_case("anyfield") {
            Self::Any
        } else {
            Self::Named(name.to_lowercase())
        }
    }
}

/// A single field comparison: the leaf of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The field (or all fields) the comparison applies to.
    pub field: FieldSpec,
    /// How the value is compared.
    pub op: ComparisonOp,
    /// The term or phrase being compared.
    pub value: String,
}

/// A parsed search expression.
///
/// The three variants are matched exhaustively in evaluation and rendering,
/// so a new node kind cannot be added without handling it everywhere it
/// matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A field comparison.
    Leaf(Comparison),

    /// Negation: the entry must NOT match the inner expression.
    Not(Box<Self>),

    /// Boolean composition of exactly two children.
    Binary {
        /// The connective joining the children.
        op: BooleanOp,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
}

impl Expr {
    /// Creates a leaf comparison node.
    pub fn leaf(field: FieldSpec, op: ComparisonOp, value: impl Into<String>) -> Self {
        Self::Leaf(Comparison {
            field,
            op,
            value: value.into(),
        })
    }

    /// Creates a negation node.
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    /// Creates a binary node.
    pub fn binary(op: BooleanOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Leaf(cmp) => {
                let field = match &cmp.field {
                    FieldSpec::Any => "any",
                    FieldSpec::Named(name) => name,
                };
                writeln!(f, "{prefix}Leaf({field} {} {:?})", cmp.op, cmp.value)
            }
            Self::Not(inner) => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Binary { op, left, right } => {
                writeln!(f, "{prefix}{}", match op {
                    BooleanOp::And => "And",
                    BooleanOp::Or => "Or",
                })?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

//! Query evaluation against the entry collection.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use bib_entry::{Entry, EntryId};
use bib_query::{
    BooleanOp, Comparison, ComparisonOp, Expr, FieldSpec, Query, QueryKind, SearchFlags,
};
use regex::Regex;
use tracing::warn;

use crate::{fulltext::FulltextIndex, result::MatchResult};

/// Fulltext matches fetched for one execution, keyed by needle.
///
/// Empty when no backend is configured or the backend failed (degraded
/// field-only matching).
type FulltextMatches = HashMap<String, HashSet<EntryId>>;

/// Evaluates parsed queries against entry collections.
#[derive(Clone, Default)]
pub struct Searcher {
    /// Optional fulltext backend for linked-file content.
    fulltext: Option<Arc<dyn FulltextIndex>>,
}

impl Searcher {
    /// Creates a searcher without a fulltext backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a searcher that delegates fulltext matching to `index`.
    pub fn with_fulltext(index: Arc<dyn FulltextIndex>) -> Self {
        Self {
            fulltext: Some(index),
        }
    }

    /// Executes a query over the full entry slice.
    ///
    /// Scans every entry and returns the matches in the input slice's
    /// relative order. Never fails: a broken fulltext backend degrades to
    /// field-only matching.
    pub fn execute(&self, query: &Query, entries: &[Entry]) -> MatchResult {
        let fulltext = self.fetch_fulltext(query);

        let matched = entries
            .iter()
            .filter(|entry| entry_matches(query, entry, &fulltext))
            .map(|entry| entry.id.clone())
            .collect();

        MatchResult::new(matched)
    }

    /// Fetches fulltext matches for every needle the query can use.
    ///
    /// Returns an empty map when the fulltext flag is off, no backend is
    /// configured, or the backend fails (the failure is logged, not
    /// surfaced).
    fn fetch_fulltext(&self, query: &Query) -> FulltextMatches {
        if !query.flags().fulltext() {
            return FulltextMatches::new();
        }

        let Some(index) = &self.fulltext else {
            return FulltextMatches::new();
        };

        let mut matches = FulltextMatches::new();
        for needle in fulltext_needles(query) {
            match index.search(&needle, query.flags().case_sensitive()) {
                Ok(ids) => {
                    matches.insert(needle, ids);
                }
                Err(err) => {
                    warn!("fulltext search degraded to field-only matching: {err}");
                    return FulltextMatches::new();
                }
            }
        }

        matches
    }
}

/// Collects the terms a query would hand to the fulltext backend.
///
/// Plain and regex queries search their whole text; grammar queries search
/// the values of any-field contains leaves. Field-scoped and negated
/// comparisons stay field-only.
fn fulltext_needles(query: &Query) -> Vec<String> {
    match query.kind() {
        QueryKind::Plain { .. } | QueryKind::Regex { .. } => vec![query.text().to_string()],
        QueryKind::Grammar { expr } => {
            let mut needles = Vec::new();
            collect_any_contains(expr, &mut needles);
            needles
        }
    }
}

/// Walks the expression tree collecting any-field contains values.
fn collect_any_contains(expr: &Expr, needles: &mut Vec<String>) {
    match expr {
        Expr::Leaf(cmp) => {
            if cmp.field == FieldSpec::Any
                && cmp.op == ComparisonOp::Contains
                && !needles.contains(&cmp.value)
            {
                needles.push(cmp.value.clone());
            }
        }
        Expr::Not(inner) => collect_any_contains(inner, needles),
        Expr::Binary { left, right, .. } => {
            collect_any_contains(left, needles);
            collect_any_contains(right, needles);
        }
    }
}

/// Whether one entry matches the query.
fn entry_matches(query: &Query, entry: &Entry, fulltext: &FulltextMatches) -> bool {
    match query.kind() {
        QueryKind::Plain { pattern } | QueryKind::Regex { pattern } => {
            pattern_matches_entry(pattern, entry)
                || in_fulltext(fulltext, query.text(), &entry.id)
        }
        QueryKind::Grammar { expr } => eval_expr(expr, entry, query.flags(), fulltext),
    }
}

/// Whether any field value of the entry matches the pattern.
fn pattern_matches_entry(pattern: &Regex, entry: &Entry) -> bool {
    entry.field_values().any(|value| pattern.is_match(value))
}

/// Whether the fulltext backend reported the entry for the needle.
fn in_fulltext(fulltext: &FulltextMatches, needle: &str, id: &EntryId) -> bool {
    fulltext.get(needle).is_some_and(|ids| ids.contains(id))
}

/// Recursive evaluation of a grammar expression against one entry.
///
/// Boolean precedence (NOT over AND over OR) is already encoded in the
/// tree shape; evaluation just follows it exhaustively.
fn eval_expr(expr: &Expr, entry: &Entry, flags: SearchFlags, fulltext: &FulltextMatches) -> bool {
    match expr {
        Expr::Leaf(cmp) => eval_leaf(cmp, entry, flags, fulltext),
        Expr::Not(inner) => !eval_expr(inner, entry, flags, fulltext),
        Expr::Binary { op, left, right } => {
            let lhs = eval_expr(left, entry, flags, fulltext);
            match op {
                BooleanOp::And => lhs && eval_expr(right, entry, flags, fulltext),
                BooleanOp::Or => lhs || eval_expr(right, entry, flags, fulltext),
            }
        }
    }
}

/// Evaluates one field comparison.
///
/// A missing named field does not contain anything: `=` and `==` are false
/// and `!=` is true. Fulltext only extends any-field contains leaves.
fn eval_leaf(
    cmp: &Comparison,
    entry: &Entry,
    flags: SearchFlags,
    fulltext: &FulltextMatches,
) -> bool {
    let case = flags.case_sensitive();

    match (&cmp.field, cmp.op) {
        (FieldSpec::Any, ComparisonOp::Contains) => {
            entry
                .field_values()
                .any(|value| value_contains(value, &cmp.value, case))
                || in_fulltext(fulltext, &cmp.value, &entry.id)
        }
        (FieldSpec::Any, ComparisonOp::Exact) => entry
            .field_values()
            .any(|value| value_equals(value, &cmp.value, case)),
        (FieldSpec::Any, ComparisonOp::NotContains) => !entry
            .field_values()
            .any(|value| value_contains(value, &cmp.value, case)),
        (FieldSpec::Named(name), op) => {
            let value = entry.field(name);
            match op {
                ComparisonOp::Contains => {
                    value.is_some_and(|v| value_contains(v, &cmp.value, case))
                }
                ComparisonOp::Exact => value.is_some_and(|v| value_equals(v, &cmp.value, case)),
                ComparisonOp::NotContains => {
                    !value.is_some_and(|v| value_contains(v, &cmp.value, case))
                }
            }
        }
    }
}

/// Substring containment honoring the case flag.
fn value_contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// String equality honoring the case flag.
fn value_equals(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack == needle
    } else {
        haystack.to_lowercase() == needle.to_lowercase()
    }
}

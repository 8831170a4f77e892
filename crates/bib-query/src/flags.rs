//! Search modifier flags.

/// Modifiers that alter how query text is parsed and matched.
///
/// Flags are shared with persisted preferences, so they behave as an
/// immutable value: the `with_*` methods return a fresh instance instead of
/// mutating in place. Every combination of flags is legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFlags {
    /// Literal comparisons honor letter case.
    case_sensitive: bool,
    /// The query text is a regular expression.
    regex: bool,
    /// Matching extends to indexed linked-file content.
    fulltext: bool,
}

impl SearchFlags {
    /// Returns the default flag set (everything off).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether literal comparisons honor letter case.
    pub fn case_sensitive(self) -> bool {
        self.case_sensitive
    }

    /// Whether the query text is interpreted as a regular expression.
    pub fn regex(self) -> bool {
        self.regex
    }

    /// Whether matching extends to indexed linked-file content.
    pub fn fulltext(self) -> bool {
        self.fulltext
    }

    /// Returns a copy with case sensitivity set to `on`.
    pub fn with_case_sensitive(self, on: bool) -> Self {
        Self {
            case_sensitive: on,
            ..self
        }
    }

    /// Returns a copy with regex interpretation set to `on`.
    pub fn with_regex(self, on: bool) -> Self {
        Self { regex: on, ..self }
    }

    /// Returns a copy with fulltext matching set to `on`.
    pub fn with_fulltext(self, on: bool) -> Self {
        Self {
            fulltext: on,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_off() {
        let flags = SearchFlags::new();
        assert!(!flags.case_sensitive());
        assert!(!flags.regex());
        assert!(!flags.fulltext());
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let flags = SearchFlags::new();
        let toggled = flags.with_regex(true).with_case_sensitive(true);

        assert!(!flags.regex());
        assert!(toggled.regex());
        assert!(toggled.case_sensitive());
        assert!(!toggled.fulltext());
    }
}

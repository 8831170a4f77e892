//! Keystroke-rate validity checking.
//!
//! Runs on every edit, before a full parse is attempted, to drive the
//! valid/invalid visual state of the search field without flashing errors
//! while the user is mid-expression.

use crate::{flags::SearchFlags, query::compile_pattern};

/// Checks whether search text is plausibly valid under the given flags.
///
/// For regex mode this is the authoritative pattern-compile check
/// (compilation is cheap, so "likely" is exact there). For grammar and
/// plain text it always returns `true`: literal terms never fail to parse,
/// and grammar errors are only surfaced by the debounced full parse, not on
/// every keystroke. Empty text is valid (it means "clear").
///
/// Idempotent and side-effect-free.
pub fn is_likely_valid(text: &str, flags: SearchFlags) -> bool {
    if flags.regex() {
        return compile_pattern(text, flags).is_ok();
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_always_valid() {
        let flags = SearchFlags::default();
        assert!(is_likely_valid("smith", flags));
        assert!(is_likely_valid("author=", flags));
        assert!(is_likely_valid("(((", flags));
        assert!(is_likely_valid("", flags));
    }

    #[test]
    fn regex_mode_checks_compilation() {
        let flags = SearchFlags::default().with_regex(true);
        assert!(is_likely_valid("sm.th", flags));
        assert!(!is_likely_valid("(", flags));
        assert!(!is_likely_valid("[a-", flags));
    }

    #[test]
    fn is_idempotent() {
        let flags = SearchFlags::default().with_regex(true);
        assert_eq!(is_likely_valid("(", flags), is_likely_valid("(", flags));
    }
}

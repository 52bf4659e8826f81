//! Pull request title/description convention check.

use crate::models::PrStatus;
use regex::Regex;
use std::sync::LazyLock;

/// Issue-key prefix followed by `: ` and free text, e.g. `ABC-123: fix bug`.
pub const TITLE_PATTERN: &str = r"^[A-Z]+-[0-9]+: .*$";

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TITLE_PATTERN).unwrap());

/// Check the PR title against `TITLE_PATTERN` and require a non-empty
/// description. A missing description counts as empty.
pub fn check_pr(title: &str, description: Option<&str>) -> PrStatus {
    let title_ok = TITLE_RE.is_match(title);
    let description_ok = description.is_some_and(|d| !d.is_empty());
    PrStatus {
        status: title_ok && description_ok,
        title_ok,
        description_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_title_and_description() {
        let st = check_pr("ABC-123: fix bug", Some("details"));
        assert!(st.status);
        assert_eq!(st.error_weight(), 0);
    }

    #[test]
    fn test_weights_by_failure_mode() {
        assert_eq!(check_pr("bad title", Some("d")).error_weight(), 1);
        assert_eq!(check_pr("ABC-1: ok", Some("")).error_weight(), 1);
        assert_eq!(check_pr("bad title", Some("")).error_weight(), 2);
        assert!(!check_pr("bad title", Some("")).status);
    }

    #[test]
    fn test_null_description_is_empty() {
        let st = check_pr("ABC-1: ok", None);
        assert!(!st.status);
        assert!(st.title_ok);
        assert!(!st.description_ok);
    }

    #[test]
    fn test_title_shape_edge_cases() {
        assert!(!check_pr("abc-1: lower key", Some("d")).title_ok);
        assert!(!check_pr("ABC-1:missing space", Some("d")).title_ok);
        assert!(!check_pr("ABC: no number", Some("d")).title_ok);
        assert!(check_pr("ABC-1: ", Some("d")).title_ok);
        // whitespace-only descriptions are non-empty
        assert!(check_pr("ABC-1: x", Some(" ")).description_ok);
    }
}

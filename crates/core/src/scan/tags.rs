//! Structured comment tags.
//!
//! Comments directly above a declaration may carry metadata:
//!
//! ```text
//! /**
//!  * @functionalityID: AUTH-001
//!  * @tests: tests/auth.spec.ts
//!  */
//! ```

use std::sync::LazyLock;

use regex::Regex;

static FUNCTIONALITY_ID_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@functionalityID:[ \t]*(\S+)").expect("valid regex"));

static TESTS_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@tests:[ \t]*(\S+)").expect("valid regex"));

/// Tag values mined from a block of comment text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTags {
    pub functionality_id: Option<String>,
    pub test_file: Option<String>,
}

/// Extract `@functionalityID:` and `@tests:` values from comment text.
///
/// The first occurrence of each tag wins. A value that runs into the closing
/// `*/` of a block comment is trimmed.
pub fn parse_comment_tags(comment: &str) -> CommentTags {
    CommentTags {
        functionality_id: first_capture(&FUNCTIONALITY_ID_TAG, comment),
        test_file: first_capture(&TESTS_TAG, comment),
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim_end_matches("*/");
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_tags_from_block_comment() {
        let tags = parse_comment_tags("/**\n * @functionalityID: X1\n * @tests: t.spec\n */");
        assert_eq!(tags.functionality_id.as_deref(), Some("X1"));
        assert_eq!(tags.test_file.as_deref(), Some("t.spec"));
    }

    #[test]
    fn missing_tags_stay_unset() {
        assert_eq!(parse_comment_tags("// just a note"), CommentTags::default());
    }

    #[test]
    fn trims_closing_block_marker() {
        let tags = parse_comment_tags("/* @tests: a.spec.ts*/");
        assert_eq!(tags.test_file.as_deref(), Some("a.spec.ts"));
        assert_eq!(tags.functionality_id, None);
    }

    #[test]
    fn first_occurrence_wins() {
        let tags = parse_comment_tags("// @functionalityID: A\n// @functionalityID: B");
        assert_eq!(tags.functionality_id.as_deref(), Some("A"));
    }

    #[test]
    fn tag_without_value_is_ignored() {
        assert_eq!(parse_comment_tags("/* @tests: */").test_file, None);
    }
}

//! Deep-link fragments pointing at a single comment

use std::sync::LazyLock;

use regex::Regex;

use crate::comment::CommentId;

/// Matches `comment-<id>` with or without the leading `#`
static COMMENT_FRAGMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?comment-(\d+)$").expect("Invalid comment fragment regex")
});

/// Extract the comment id a page fragment points at.
///
/// Anything that is not exactly `#comment-<digits>` yields `None`.
pub fn parse_fragment(fragment: &str) -> Option<CommentId> {
    let caps = COMMENT_FRAGMENT_REGEX.captures(fragment.trim())?;
    caps.get(1)?.as_str().parse().ok().map(CommentId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_with_hash() {
        assert_eq!(parse_fragment("#comment-12"), Some(CommentId(12)));
    }

    #[test]
    fn test_parse_fragment_without_hash() {
        assert_eq!(parse_fragment("comment-3"), Some(CommentId(3)));
    }

    #[test]
    fn test_parse_fragment_rejects_other_anchors() {
        assert_eq!(parse_fragment(""), None);
        assert_eq!(parse_fragment("#top"), None);
        assert_eq!(parse_fragment("#comment-"), None);
        assert_eq!(parse_fragment("#comment-12x"), None);
        assert_eq!(parse_fragment("#comment-99999999999999999999999"), None);
    }
}

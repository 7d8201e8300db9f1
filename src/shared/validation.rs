use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating event slugs.
    /// Lowercase alphanumeric segments joined by single hyphens or underscores.
    /// - Valid: "summer-wedding", "shoot_2024", "expo1"
    /// - Invalid: "-wedding", "wedding-", "a--b", "Wedding", "a/b", ".."
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").unwrap();
}

/// A slug is used verbatim as a path segment under the uploads root, so it
/// must never carry separators or traversal sequences.
pub fn is_safe_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(is_safe_slug("summer-wedding"));
        assert!(is_safe_slug("shoot_2024"));
        assert!(is_safe_slug("expo1"));
        assert!(is_safe_slug("a"));
        assert!(is_safe_slug("a-b-c"));
        assert!(is_safe_slug("a_b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!is_safe_slug("-wedding")); // starts with separator
        assert!(!is_safe_slug("wedding-")); // ends with separator
        assert!(!is_safe_slug("a--b")); // double separator
        assert!(!is_safe_slug("Wedding")); // uppercase
        assert!(!is_safe_slug("")); // empty
        assert!(!is_safe_slug("a b")); // space
    }

    #[test]
    fn test_slug_regex_rejects_path_traversal() {
        assert!(!is_safe_slug(".."));
        assert!(!is_safe_slug("../evil"));
        assert!(!is_safe_slug("a/b"));
        assert!(!is_safe_slug("a\\b"));
        assert!(!is_safe_slug("./a"));
    }
}

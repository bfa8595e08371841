use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCHEME_PREFIX: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Turns raw scanner or keyboard input into something the URL parser can
/// take. Never fails; validity is the parser's problem.
pub struct UrlNormalizer;

impl UrlNormalizer {
    pub fn normalize(raw: &str) -> String {
        let trimmed = raw.trim();

        if SCHEME_PREFIX.is_match(trimmed) {
            trimmed.to_string()
        } else {
            format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_default_scheme() {
        assert_eq!(UrlNormalizer::normalize("example.com"), "http://example.com");
        assert_eq!(
            UrlNormalizer::normalize("192.168.1.1"),
            "http://192.168.1.1"
        );
    }

    #[test]
    fn test_keeps_existing_scheme_case_insensitively() {
        assert_eq!(
            UrlNormalizer::normalize("https://example.com"),
            "https://example.com"
        );
        assert_eq!(
            UrlNormalizer::normalize("HTTP://Example.com/Path"),
            "HTTP://Example.com/Path"
        );
        assert_eq!(UrlNormalizer::normalize("HtTpS://x.org"), "HtTpS://x.org");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            UrlNormalizer::normalize("  \t https://example.com \n"),
            "https://example.com"
        );
    }

    #[test]
    fn test_other_schemes_get_prefixed() {
        assert_eq!(
            UrlNormalizer::normalize("ftp://files.example.com"),
            "http://ftp://files.example.com"
        );
        assert_eq!(
            UrlNormalizer::normalize("javascript:alert(1)"),
            "http://javascript:alert(1)"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(UrlNormalizer::normalize(""), "http://");
        assert_eq!(UrlNormalizer::normalize("   "), "http://");
    }
}

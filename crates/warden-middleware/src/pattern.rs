//! Full-match token pattern validation.
//!
//! A located credential string is only forwarded to a resolver if the
//! entire string matches the configured pattern. Partial matches are
//! rejected, so `Token abc123` with a trailing newline or a doubled scheme
//! never reaches the resolver.
//!
//! Two shapes are supported:
//!
//! - bare: the whole value is the token (`<token>`)
//! - keyword-prefixed: `<keyword> <token>`, e.g. `Token 9944b0...` or
//!   `Bearer eyJhbGci...`, with the keyword matched literally and
//!   case-sensitively, separated by exactly one space

use regex::Regex;
use warden_core::ConfigError;

/// Token pattern applied when a builder is given none.
///
/// Accepts any value; shape checking is opt-in and resolution still decides
/// whether the token means anything.
pub const DEFAULT_TOKEN_PATTERN: &str = ".*";

/// A compiled full-match token matcher.
///
/// # Example
///
/// ```
/// use warden_middleware::TokenPattern;
///
/// let pattern = TokenPattern::with_keyword("Token", "[0-9a-f]{8}").unwrap();
/// assert_eq!(pattern.extract("Token deadbeef"), Some("deadbeef"));
/// assert_eq!(pattern.extract("token deadbeef"), None); // keyword is case-sensitive
/// assert_eq!(pattern.extract("Token deadbeef "), None); // full match only
/// ```
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
}

impl TokenPattern {
    /// Compiles a bare pattern: the whole raw value must match
    /// `token_pattern`.
    pub fn new(token_pattern: &str) -> Result<Self, ConfigError> {
        Self::compile(None, token_pattern)
    }

    /// Compiles a keyword-prefixed pattern: the raw value must be the
    /// literal `keyword`, one space, then a `token_pattern` match.
    ///
    /// The keyword is escaped, so regex metacharacters in it are matched
    /// literally.
    pub fn with_keyword(keyword: &str, token_pattern: &str) -> Result<Self, ConfigError> {
        if keyword.is_empty() {
            return Err(ConfigError::invalid("keyword", "must not be empty"));
        }
        Self::compile(Some(keyword), token_pattern)
    }

    fn compile(keyword: Option<&str>, token_pattern: &str) -> Result<Self, ConfigError> {
        let anchored = match keyword {
            Some(keyword) => format!(r"\A{} ({token_pattern})\z", regex::escape(keyword)),
            None => format!(r"\A({token_pattern})\z"),
        };
        let regex = Regex::new(&anchored)
            .map_err(|source| ConfigError::invalid_pattern(token_pattern, source))?;
        Ok(Self { regex })
    }

    /// Returns the captured token value iff the entire raw value matches.
    ///
    /// The token is capture group 1; groups inside the configured pattern
    /// shift to 2 and up, so they do not interfere.
    #[must_use]
    pub fn extract<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.regex
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// The anchored pattern as compiled, for diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX40: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

    #[test]
    fn test_bare_pattern_extracts_full_match() {
        let pattern = TokenPattern::new("[0-9a-f]{40}").unwrap();
        assert_eq!(pattern.extract(HEX40), Some(HEX40));
    }

    #[test]
    fn test_bare_pattern_rejects_partial_match() {
        let pattern = TokenPattern::new("[0-9a-f]{40}").unwrap();
        assert_eq!(pattern.extract(&format!("{HEX40}extra")), None);
        assert_eq!(pattern.extract(&format!("x{HEX40}")), None);
        assert_eq!(pattern.extract(&format!("{HEX40}\n")), None);
        assert_eq!(pattern.extract(&HEX40[..39]), None);
    }

    #[test]
    fn test_keyword_requires_single_space_separator() {
        let pattern = TokenPattern::with_keyword("Token", "[0-9a-f]{40}").unwrap();
        assert_eq!(pattern.extract(&format!("Token {HEX40}")), Some(HEX40));
        assert_eq!(pattern.extract(&format!("Token  {HEX40}")), None);
        assert_eq!(pattern.extract(&format!("Token\t{HEX40}")), None);
        assert_eq!(pattern.extract(HEX40), None);
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        let pattern = TokenPattern::with_keyword("Token", "[0-9a-f]{40}").unwrap();
        assert_eq!(pattern.extract(&format!("token {HEX40}")), None);
        assert_eq!(pattern.extract(&format!("TOKEN {HEX40}")), None);
    }

    #[test]
    fn test_keyword_is_escaped_literally() {
        let pattern = TokenPattern::with_keyword("T.k*n", "[a-z]+").unwrap();
        assert_eq!(pattern.extract("T.k*n abc"), Some("abc"));
        assert_eq!(pattern.extract("Tokkn abc"), None);
    }

    #[test]
    fn test_inner_groups_do_not_shift_extraction() {
        let pattern = TokenPattern::new("([0-9]+)-([a-z]+)").unwrap();
        assert_eq!(pattern.extract("42-abc"), Some("42-abc"));
    }

    #[test]
    fn test_default_pattern_accepts_anything() {
        let pattern = TokenPattern::new(DEFAULT_TOKEN_PATTERN).unwrap();
        assert_eq!(pattern.extract("anything at all"), Some("anything at all"));
        assert_eq!(pattern.extract(""), Some(""));
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        let err = TokenPattern::new("(").expect_err("should not compile");
        assert!(err.to_string().contains("invalid token pattern"));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let err = TokenPattern::with_keyword("", ".*").expect_err("should be rejected");
        assert!(err.to_string().contains("keyword"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn exact_hex_tokens_extract(token in "[0-9a-f]{40}") {
                let pattern = TokenPattern::new("[0-9a-f]{40}").unwrap();
                prop_assert_eq!(pattern.extract(&token), Some(token.as_str()));
            }

            #[test]
            fn padded_hex_tokens_never_extract(
                token in "[0-9a-f]{40}",
                pad in "[0-9a-f]{1,8}",
            ) {
                let pattern = TokenPattern::new("[0-9a-f]{40}").unwrap();
                let front_padded = format!("{pad}{token}");
                let back_padded = format!("{token}{pad}");
                prop_assert!(pattern.extract(&front_padded).is_none());
                prop_assert!(pattern.extract(&back_padded).is_none());
            }

            #[test]
            fn keyword_form_roundtrips(token in "[0-9a-f]{40}") {
                let pattern = TokenPattern::with_keyword("Token", "[0-9a-f]{40}").unwrap();
                let prefixed = format!("Token {token}");
                prop_assert_eq!(pattern.extract(&prefixed), Some(token.as_str()));
                prop_assert!(pattern.extract(&token).is_none());
            }
        }
    }
}

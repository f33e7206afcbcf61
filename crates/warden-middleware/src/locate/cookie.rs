//! Cookie token locator.

use super::TokenLocator;
use crate::types::Request;
use http::header;
use warden_core::ConfigError;

/// Locates a token in a named cookie.
///
/// Parses the `Cookie` request header directly: `;`-separated pairs, split
/// on the first `=`, names and values trimmed, optional surrounding double
/// quotes stripped from the value. The first pair with a matching name wins.
///
/// # Example
///
/// ```
/// use warden_middleware::CookieLocator;
///
/// let locator = CookieLocator::new("sessionid").unwrap();
/// assert_eq!(locator.name(), "sessionid");
/// ```
#[derive(Debug, Clone)]
pub struct CookieLocator {
    name: String,
}

impl CookieLocator {
    /// Creates a locator for the given cookie name.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::invalid("cookie", "must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// The cookie name this locator reads.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TokenLocator for CookieLocator {
    fn source(&self) -> &'static str {
        "cookie"
    }

    fn locate(&self, request: &Request) -> Option<String> {
        let raw = request.headers().get(header::COOKIE)?.to_str().ok()?;
        for pair in raw.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if name.trim() == self.name {
                let value = value.trim().trim_matches('"');
                if value.is_empty() {
                    return None;
                }
                return Some(value.to_string());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Request as HttpRequest;
    use http_body_util::Full;

    fn request_with_cookies(value: &str) -> Request {
        HttpRequest::builder()
            .uri("/")
            .header(header::COOKIE, value)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_locates_named_cookie() {
        let locator = CookieLocator::new("sessionid").unwrap();
        let request = request_with_cookies("theme=dark; sessionid=abc123; lang=en");
        assert_eq!(locator.locate(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_strips_quotes_and_whitespace() {
        let locator = CookieLocator::new("sessionid").unwrap();
        let request = request_with_cookies(r#"sessionid = "abc123" "#);
        assert_eq!(locator.locate(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let locator = CookieLocator::new("token").unwrap();
        let request = request_with_cookies("token=abc=def");
        assert_eq!(locator.locate(&request), Some("abc=def".to_string()));
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let locator = CookieLocator::new("sessionid").unwrap();
        let request = request_with_cookies("theme=dark");
        assert_eq!(locator.locate(&request), None);

        let bare = HttpRequest::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert_eq!(locator.locate(&bare), None);
    }

    #[test]
    fn test_empty_value_is_none() {
        let locator = CookieLocator::new("sessionid").unwrap();
        let request = request_with_cookies("sessionid=; theme=dark");
        assert_eq!(locator.locate(&request), None);
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let locator = CookieLocator::new("sessionid").unwrap();
        let request = request_with_cookies("garbage; sessionid=abc123");
        assert_eq!(locator.locate(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_empty_name_fails_fast() {
        assert!(CookieLocator::new("").is_err());
    }

    #[test]
    fn test_source_label() {
        let locator = CookieLocator::new("sessionid").unwrap();
        assert_eq!(locator.source(), "cookie");
    }
}

//! Query-string token locator.

use super::TokenLocator;
use crate::types::Request;
use warden_core::ConfigError;

/// Locates a token in a query-string parameter.
///
/// This is the carrier of last resort for WebSocket handshakes, where
/// browsers cannot set request headers. Parsing goes through
/// `serde_urlencoded`, so percent-escapes and `+`-encoded spaces are
/// decoded. The first occurrence of the parameter wins.
///
/// # Example
///
/// ```
/// use warden_middleware::QueryLocator;
///
/// let locator = QueryLocator::new("jwt").unwrap();
/// assert_eq!(locator.param(), "jwt");
/// ```
#[derive(Debug, Clone)]
pub struct QueryLocator {
    param: String,
}

impl QueryLocator {
    /// Creates a locator for the given query parameter.
    pub fn new(param: &str) -> Result<Self, ConfigError> {
        if param.is_empty() {
            return Err(ConfigError::invalid("query_param", "must not be empty"));
        }
        Ok(Self {
            param: param.to_string(),
        })
    }

    /// The query parameter this locator reads.
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }
}

impl TokenLocator for QueryLocator {
    fn source(&self) -> &'static str {
        "query"
    }

    fn locate(&self, request: &Request) -> Option<String> {
        let query = request.uri().query()?;
        // Malformed query strings read as absent rather than erroring.
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
        pairs
            .into_iter()
            .find(|(name, _)| name == &self.param)
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Request as HttpRequest;
    use http_body_util::Full;

    fn request_with_uri(uri: &str) -> Request {
        HttpRequest::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_locates_parameter() {
        let locator = QueryLocator::new("token").unwrap();
        let request = request_with_uri("/ws?version=2&token=abc123");
        assert_eq!(locator.locate(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let locator = QueryLocator::new("token").unwrap();
        let request = request_with_uri("/ws?token=first&token=second");
        assert_eq!(locator.locate(&request), Some("first".to_string()));
    }

    #[test]
    fn test_percent_decoding() {
        let locator = QueryLocator::new("token").unwrap();
        let request = request_with_uri("/ws?token=Token%209944b0");
        assert_eq!(locator.locate(&request), Some("Token 9944b0".to_string()));
    }

    #[test]
    fn test_missing_parameter_is_none() {
        let locator = QueryLocator::new("token").unwrap();
        assert_eq!(locator.locate(&request_with_uri("/ws?other=1")), None);
        assert_eq!(locator.locate(&request_with_uri("/ws")), None);
    }

    #[test]
    fn test_empty_value_is_none() {
        let locator = QueryLocator::new("token").unwrap();
        assert_eq!(locator.locate(&request_with_uri("/ws?token=")), None);
    }

    #[test]
    fn test_empty_param_fails_fast() {
        assert!(QueryLocator::new("").is_err());
    }

    #[test]
    fn test_source_label() {
        let locator = QueryLocator::new("token").unwrap();
        assert_eq!(locator.source(), "query");
    }
}

//! Header token locator.

use super::TokenLocator;
use crate::types::Request;
use http::HeaderName;
use warden_core::ConfigError;

/// Locates a token in a request header.
///
/// The header name is validated and normalized to lowercase at construction,
/// so matching is case-insensitive regardless of how the client spells it.
/// When the header appears multiple times, the first value wins.
///
/// # Example
///
/// ```
/// use warden_middleware::HeaderLocator;
///
/// let locator = HeaderLocator::new("Authorization").unwrap();
/// assert_eq!(locator.name(), "authorization");
/// ```
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    name: HeaderName,
}

impl HeaderLocator {
    /// Creates a locator for the given header name.
    ///
    /// Fails fast on names that are not valid HTTP header names.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::invalid("header", format!("invalid header name `{name}`")))?;
        Ok(Self { name })
    }

    /// The normalized (lowercase) header name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl TokenLocator for HeaderLocator {
    fn source(&self) -> &'static str {
        "header"
    }

    fn locate(&self, request: &Request) -> Option<String> {
        // Non-UTF-8 header values read as absent rather than erroring.
        let value = request.headers().get(&self.name)?.to_str().ok()?;
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }
}

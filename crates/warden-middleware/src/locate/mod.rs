//! Token locators: where in a request a credential may live.
//!
//! A locator inspects one carrier (a header, a cookie, the query string)
//! and returns the raw credential string, undecoded and unvalidated. Shape
//! checking belongs to [`crate::TokenPattern`]; meaning belongs to the
//! resolver.
//!
//! All locators treat an empty located value as absent, and none of them
//! ever fail: malformed carriers simply yield `None`.

mod cookie;
mod header;
mod query;

pub use cookie::CookieLocator;
pub use header::HeaderLocator;
pub use query::QueryLocator;

use crate::types::Request;

/// Locates a candidate token in a request.
pub trait TokenLocator: Send + Sync + 'static {
    /// Short label for log fields: `header`, `cookie`, or `query`.
    fn source(&self) -> &'static str;

    /// Returns the raw credential string, or `None` when the carrier is
    /// missing, unreadable, or empty.
    fn locate(&self, request: &Request) -> Option<String>;
}

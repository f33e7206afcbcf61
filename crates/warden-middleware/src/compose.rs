//! Composition helpers: chained token sources with fixed precedence.
//!
//! WebSocket handshakes are the motivating case. A non-browser client can
//! send `Authorization: Token ...` on the handshake request; a browser
//! cannot set headers there and must fall back to a query parameter. The
//! helpers below build a two-stage pipeline that tries the header first and
//! the query string second.
//!
//! Precedence costs nothing extra to enforce: a stage never replaces a
//! resolved user, and a resolved Anonymous is re-attempted, so the fallback
//! stage only acts when the primary found nobody.

use crate::auth::{AuthTokenMiddleware, API_TOKEN_PATTERN};
use crate::pipeline::AuthPipeline;
use std::sync::Arc;
use warden_core::IdentityResolver;

/// Query parameter read by the fallback stages below.
pub const AUTHORIZATION_QUERY_PARAM: &str = "authorization";

/// Chains two token middlewares with fixed precedence: `first` runs first,
/// and `second` only has effect when `first` resolved Anonymous.
#[must_use]
pub fn try_in_order(first: AuthTokenMiddleware, second: AuthTokenMiddleware) -> AuthPipeline {
    AuthPipeline::builder().layer(first).layer(second).build()
}

/// `Authorization: Token <40 hex>` with an `?authorization=<40 hex>` query
/// fallback, both resolved against the same store.
///
/// The query form carries the bare token, no keyword.
#[must_use]
pub fn api_token_with_query_fallback(resolver: Arc<dyn IdentityResolver>) -> AuthPipeline {
    let primary = AuthTokenMiddleware::api_token(resolver.clone());
    let fallback = AuthTokenMiddleware::builder()
        .query_param(AUTHORIZATION_QUERY_PARAM)
        .token_pattern(API_TOKEN_PATTERN)
        .resolver(resolver)
        .build()
        .expect("static query fallback configuration is valid");
    try_in_order(primary, fallback)
}

/// `Authorization: Bearer <token>` with an `?authorization=<token>` query
/// fallback, both resolved by the same verifier.
#[must_use]
pub fn bearer_with_query_fallback(resolver: Arc<dyn IdentityResolver>) -> AuthPipeline {
    let primary = AuthTokenMiddleware::bearer(resolver.clone());
    let fallback = AuthTokenMiddleware::builder()
        .query_param(AUTHORIZATION_QUERY_PARAM)
        .resolver(resolver)
        .build()
        .expect("static query fallback configuration is valid");
    try_in_order(primary, fallback)
}

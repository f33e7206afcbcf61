//! The token authentication middleware.
//!
//! [`AuthTokenMiddleware`] wires one [`TokenLocator`], one [`TokenPattern`],
//! and one [`IdentityResolver`] into a middleware stage. Per request it
//! locates a candidate credential, shape-checks it, resolves it, and writes
//! the outcome into the context's identity slot before the inner handler
//! runs.
//!
//! # Failure policy
//!
//! Every per-request failure resolves to [`Identity::Anonymous`]: no carrier,
//! no pattern match, unknown token, expired signature, store outage. The
//! denial reason is visible in debug logs only; the handler and the client
//! cannot distinguish the cases.
//!
//! # Idempotence
//!
//! A stage never replaces a user resolved by an earlier stage. A resolved
//! Anonymous is fair game, which is what makes fallback chains work (see
//! [`crate::compose`]).

use crate::context::AuthContext;
use crate::locate::{CookieLocator, HeaderLocator, QueryLocator, TokenLocator};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::pattern::{TokenPattern, DEFAULT_TOKEN_PATTERN};
use crate::types::{Request, Response};
use std::fmt;
use std::sync::Arc;
use warden_core::{ConfigError, Identity, IdentityResolver, Resolution};

/// Header carrying API tokens and bearer tokens.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Token pattern for store-backed hex API keys.
pub const API_TOKEN_PATTERN: &str = "[0-9a-f]{40}";

/// Middleware that authenticates requests by token.
///
/// Built via [`AuthTokenMiddleware::builder`] or one of the presets. The
/// middleware decorates the context and always forwards the request; it
/// never writes a response of its own.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use warden_middleware::AuthTokenMiddleware;
///
/// let middleware = AuthTokenMiddleware::builder()
///     .cookie("sessionid")
///     .resolver(resolver)
///     .build()?;
/// ```
pub struct AuthTokenMiddleware {
    name: &'static str,
    locator: Box<dyn TokenLocator>,
    pattern: TokenPattern,
    resolver: Arc<dyn IdentityResolver>,
}

impl AuthTokenMiddleware {
    /// Starts building a middleware.
    #[must_use]
    pub fn builder() -> AuthTokenBuilder {
        AuthTokenBuilder::default()
    }

    /// Preset: `Authorization: Token <40 hex chars>`, the classic
    /// store-backed API key scheme.
    #[must_use]
    pub fn api_token(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self::builder()
            .header(AUTHORIZATION_HEADER)
            .keyword("Token")
            .token_pattern(API_TOKEN_PATTERN)
            .resolver(resolver)
            .build()
            .expect("static api token configuration is valid")
    }

    /// Preset: `Authorization: Bearer <token>` for signed tokens.
    ///
    /// No shape check beyond the keyword; the verifier decides what a
    /// well-formed token is.
    #[must_use]
    pub fn bearer(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self::builder()
            .header(AUTHORIZATION_HEADER)
            .keyword("Bearer")
            .resolver(resolver)
            .build()
            .expect("static bearer configuration is valid")
    }

    /// Runs locate, pattern-check, and resolution for one request.
    ///
    /// Infallible: every failure mode collapses to Anonymous.
    async fn authenticate(&self, request: &Request) -> Identity {
        let Some(raw) = self.locator.locate(request) else {
            return Identity::Anonymous;
        };

        // An empty captured token is no credential. The raw value is never
        // logged; it may be a live secret.
        let token = match self.pattern.extract(&raw) {
            Some(token) if !token.is_empty() => token,
            _ => {
                tracing::debug!(
                    source = self.locator.source(),
                    "credential present but did not match pattern"
                );
                return Identity::Anonymous;
            }
        };

        match self.resolver.resolve(token).await {
            Resolution::User(record) => {
                let identity = Identity::User(record);
                tracing::debug!(
                    resolver = self.resolver.name(),
                    source = self.locator.source(),
                    identity = %identity,
                    "token resolved"
                );
                identity
            }
            Resolution::Denied(reason) => {
                tracing::debug!(
                    resolver = self.resolver.name(),
                    source = self.locator.source(),
                    reason = %reason,
                    "token denied"
                );
                Identity::Anonymous
            }
        }
    }
}

impl fmt::Debug for AuthTokenMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokenMiddleware")
            .field("name", &self.name)
            .field("source", &self.locator.source())
            .field("pattern", &self.pattern.as_str())
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

impl Middleware for AuthTokenMiddleware {
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut AuthContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            // A user resolved by an earlier stage is final; Anonymous and
            // untouched slots get (re)resolved.
            if ctx.identity_slot().needs_resolution() {
                let identity = self.authenticate(&request).await;
                ctx.resolve_identity(identity);
            }
            next.run(ctx, request).await
        })
    }
}

/// Which carrier a middleware reads its token from.
enum Carrier {
    Header(String),
    Cookie(String),
    Query(String),
}

/// Builder for [`AuthTokenMiddleware`].
///
/// All validation happens in [`AuthTokenBuilder::build`]: a missing carrier
/// or resolver, an invalid header name, an uncompilable pattern, or a
/// keyword on a non-header carrier all fail there, before any request is
/// served.
#[derive(Default)]
pub struct AuthTokenBuilder {
    carrier: Option<Carrier>,
    keyword: Option<String>,
    token_pattern: Option<String>,
    resolver: Option<Arc<dyn IdentityResolver>>,
}

impl AuthTokenBuilder {
    /// Reads the token from a request header. Replaces any previously
    /// configured carrier.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>) -> Self {
        self.carrier = Some(Carrier::Header(name.into()));
        self
    }

    /// Requires a literal scheme keyword before the token, e.g. `Token` or
    /// `Bearer`. Only valid with a header carrier.
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Reads the token from a named cookie. Replaces any previously
    /// configured carrier.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>) -> Self {
        self.carrier = Some(Carrier::Cookie(name.into()));
        self
    }

    /// Reads the token from a query-string parameter. Replaces any
    /// previously configured carrier.
    #[must_use]
    pub fn query_param(mut self, param: impl Into<String>) -> Self {
        self.carrier = Some(Carrier::Query(param.into()));
        self
    }

    /// Sets the token pattern. Defaults to
    /// [`DEFAULT_TOKEN_PATTERN`](crate::DEFAULT_TOKEN_PATTERN) (accept
    /// anything).
    #[must_use]
    pub fn token_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.token_pattern = Some(pattern.into());
        self
    }

    /// Sets the resolver that turns tokens into identities.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Validates the configuration and builds the middleware.
    pub fn build(self) -> Result<AuthTokenMiddleware, ConfigError> {
        let resolver = self.resolver.ok_or_else(|| ConfigError::missing("resolver"))?;
        let carrier = self.carrier.ok_or_else(|| ConfigError::missing("carrier"))?;
        let token_pattern = self.token_pattern.as_deref().unwrap_or(DEFAULT_TOKEN_PATTERN);

        let (name, locator, pattern): (&'static str, Box<dyn TokenLocator>, TokenPattern) =
            match carrier {
                Carrier::Header(header) => {
                    let locator = HeaderLocator::new(&header)?;
                    let pattern = match self.keyword.as_deref() {
                        Some(keyword) => TokenPattern::with_keyword(keyword, token_pattern)?,
                        None => TokenPattern::new(token_pattern)?,
                    };
                    ("header_token", Box::new(locator), pattern)
                }
                Carrier::Cookie(cookie) => {
                    Self::reject_keyword(self.keyword.as_deref())?;
                    let locator = CookieLocator::new(&cookie)?;
                    ("cookie_token", Box::new(locator), TokenPattern::new(token_pattern)?)
                }
                Carrier::Query(param) => {
                    Self::reject_keyword(self.keyword.as_deref())?;
                    let locator = QueryLocator::new(&param)?;
                    ("query_token", Box::new(locator), TokenPattern::new(token_pattern)?)
                }
            };

        Ok(AuthTokenMiddleware {
            name,
            locator,
            pattern,
            resolver,
        })
    }

    fn reject_keyword(keyword: Option<&str>) -> Result<(), ConfigError> {
        if keyword.is_some() {
            return Err(ConfigError::invalid(
                "keyword",
                "only valid with a header carrier",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;
    use warden_core::fixtures::{alice, FixedResolver};
    use warden_core::DenyReason;

    const HEX40: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

    fn make_request(builder: http::request::Builder) -> Request {
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("OK")))
                    .unwrap()
            })
        })
    }

    fn api_token_middleware(resolver: FixedResolver) -> AuthTokenMiddleware {
        AuthTokenMiddleware::api_token(Arc::new(resolver))
    }

    #[tokio::test]
    async fn test_resolves_matching_header_token() {
        let middleware = api_token_middleware(FixedResolver::user(alice()));
        let mut ctx = AuthContext::new();
        let request = make_request(
            HttpRequest::builder()
                .uri("/")
                .header("Authorization", format!("Token {HEX40}")),
        );

        let response = middleware.process(&mut ctx, request, ok_handler()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.identity().to_string(), "user:user-alice");
    }

    #[tokio::test]
    async fn test_shape_mismatch_resolves_anonymous_without_resolver_call() {
        // Resolver would return a user; the pattern must stop it first.
        let middleware = api_token_middleware(FixedResolver::user(alice()));
        let mut ctx = AuthContext::new();
        let request = make_request(
            HttpRequest::builder()
                .uri("/")
                .header("authorization", "Token not-hex"),
        );

        let _response = middleware.process(&mut ctx, request, ok_handler()).await;
        assert!(ctx.identity().is_anonymous());
        assert!(ctx.identity_slot().is_resolved());
    }

    #[tokio::test]
    async fn test_denied_resolution_reads_as_anonymous() {
        let middleware = api_token_middleware(FixedResolver::denied(DenyReason::UnknownToken));
        let mut ctx = AuthContext::new();
        let request = make_request(
            HttpRequest::builder()
                .uri("/")
                .header("authorization", format!("Token {HEX40}")),
        );

        let response = middleware.process(&mut ctx, request, ok_handler()).await;
        // The denial is invisible to the response path
        assert_eq!(response.status(), StatusCode::OK);
        assert!(ctx.identity().is_anonymous());
        assert!(ctx.identity_slot().is_resolved());
    }

    #[tokio::test]
    async fn test_no_credential_resolves_anonymous() {
        let middleware = api_token_middleware(FixedResolver::user(alice()));
        let mut ctx = AuthContext::new();
        let request = make_request(HttpRequest::builder().uri("/"));

        let _response = middleware.process(&mut ctx, request, ok_handler()).await;
        assert!(ctx.identity().is_anonymous());
        assert!(ctx.identity_slot().is_resolved());
    }

    #[tokio::test]
    async fn test_never_replaces_resolved_user() {
        let middleware = api_token_middleware(FixedResolver::user(alice()));
        let mut ctx = AuthContext::with_identity(Identity::user("session-user"));
        let request = make_request(
            HttpRequest::builder()
                .uri("/")
                .header("authorization", format!("Token {HEX40}")),
        );

        let _response = middleware.process(&mut ctx, request, ok_handler()).await;
        assert_eq!(ctx.identity().to_string(), "user:session-user");
    }

    #[tokio::test]
    async fn test_upgrades_resolved_anonymous() {
        let middleware = api_token_middleware(FixedResolver::user(alice()));
        let mut ctx = AuthContext::with_identity(Identity::Anonymous);
        let request = make_request(
            HttpRequest::builder()
                .uri("/")
                .header("authorization", format!("Token {HEX40}")),
        );

        let _response = middleware.process(&mut ctx, request, ok_handler()).await;
        assert_eq!(ctx.identity().to_string(), "user:user-alice");
    }

    #[tokio::test]
    async fn test_empty_extracted_token_is_anonymous() {
        // Default pattern accepts "", but an empty token is no credential.
        let middleware = AuthTokenMiddleware::builder()
            .query_param("token")
            .resolver(Arc::new(FixedResolver::user(alice())))
            .build()
            .unwrap();
        let mut ctx = AuthContext::new();
        let request = make_request(HttpRequest::builder().uri("/ws?token="));

        let _response = middleware.process(&mut ctx, request, ok_handler()).await;
        assert!(ctx.identity().is_anonymous());
    }

    #[test]
    fn test_stage_names_follow_carrier() {
        let resolver: Arc<dyn IdentityResolver> = Arc::new(FixedResolver::user(alice()));
        let header = AuthTokenMiddleware::api_token(resolver.clone());
        assert_eq!(header.name(), "header_token");

        let cookie = AuthTokenMiddleware::builder()
            .cookie("sessionid")
            .resolver(resolver.clone())
            .build()
            .unwrap();
        assert_eq!(cookie.name(), "cookie_token");

        let query = AuthTokenMiddleware::builder()
            .query_param("token")
            .resolver(resolver)
            .build()
            .unwrap();
        assert_eq!(query.name(), "query_token");
    }

    #[test]
    fn test_build_fails_without_resolver() {
        let err = AuthTokenMiddleware::builder()
            .header("authorization")
            .build()
            .expect_err("resolver is required");
        assert!(err.to_string().contains("resolver"));
    }

    #[test]
    fn test_build_fails_without_carrier() {
        let err = AuthTokenMiddleware::builder()
            .resolver(Arc::new(FixedResolver::user(alice())))
            .build()
            .expect_err("carrier is required");
        assert!(err.to_string().contains("carrier"));
    }

    #[test]
    fn test_build_fails_on_bad_pattern() {
        let err = AuthTokenMiddleware::builder()
            .header("authorization")
            .token_pattern("(")
            .resolver(Arc::new(FixedResolver::user(alice())))
            .build()
            .expect_err("pattern should not compile");
        assert!(err.to_string().contains("invalid token pattern"));
    }

    #[test]
    fn test_build_fails_on_keyword_with_cookie() {
        let err = AuthTokenMiddleware::builder()
            .cookie("sessionid")
            .keyword("Token")
            .resolver(Arc::new(FixedResolver::user(alice())))
            .build()
            .expect_err("keyword needs a header carrier");
        assert!(err.to_string().contains("keyword"));
    }

    #[test]
    fn test_build_fails_on_invalid_header_name() {
        let err = AuthTokenMiddleware::builder()
            .header("not a header")
            .resolver(Arc::new(FixedResolver::user(alice())))
            .build()
            .expect_err("header name is invalid");
        assert!(err.to_string().contains("invalid header name"));
    }
}

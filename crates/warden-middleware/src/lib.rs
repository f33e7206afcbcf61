//! # Warden Middleware
//!
//! Token authentication middleware for async HTTP and WebSocket services.
//!
//! Each request flows through a chain of middleware stages before reaching
//! the handler. An authentication stage locates a credential, validates its
//! shape, resolves it to an identity, and records the outcome in the
//! per-request [`AuthContext`]:
//!
//! ```text
//! Request → locate (header/cookie/query) → pattern (full match)
//!         → resolve (store/JWT)          → identity slot → Handler
//! ```
//!
//! ## Key properties
//!
//! - **Handlers always see an identity**: a resolved user or Anonymous,
//!   never an absent value
//! - **Failures are silent**: a missing, malformed, unknown, or expired
//!   token resolves to Anonymous; nothing about the cause reaches the
//!   client
//! - **Fail-fast construction**: invalid patterns, header names, or missing
//!   parameters error at build time, not at request time
//! - **Composable sources**: chained stages give header-then-query
//!   precedence for WebSocket handshakes ([`compose`])
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_core::fixtures::{alice, FixedResolver};
//! use warden_middleware::AuthTokenMiddleware;
//!
//! let middleware = AuthTokenMiddleware::builder()
//!     .cookie("sessionid")
//!     .token_pattern("[0-9a-f]{40}")
//!     .resolver(Arc::new(FixedResolver::user(alice())))
//!     .build()
//!     .unwrap();
//! ```

#![doc(html_root_url = "https://docs.rs/warden-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod compose;
pub mod context;
pub mod locate;
pub mod middleware;
pub mod pattern;
pub mod pipeline;
pub mod types;

// Flatten the submodule surface at the crate root
pub use auth::{AuthTokenBuilder, AuthTokenMiddleware, API_TOKEN_PATTERN, AUTHORIZATION_HEADER};
pub use compose::{
    api_token_with_query_fallback, bearer_with_query_fallback, try_in_order,
    AUTHORIZATION_QUERY_PARAM,
};
pub use context::{AuthContext, RequestId};
pub use locate::{CookieLocator, HeaderLocator, QueryLocator, TokenLocator};
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Next};
pub use pattern::{TokenPattern, DEFAULT_TOKEN_PATTERN};
pub use pipeline::{AuthPipeline, AuthPipelineBuilder, BoxedMiddleware};
pub use types::{Request, Response};

//! The asynchronous token-to-identity resolver contract.
//!
//! Locating and shape-checking a token is cheap and synchronous; deciding
//! who it belongs to is not. [`IdentityResolver`] is the seam where that
//! decision happens: a store lookup, a signature verification, a directory
//! call. Implementations live in `warden-resolve` or in the host
//! application.

use crate::identity::UserRecord;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type used at trait seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a resolver reports for one token.
///
/// There is no error variant on purpose. Per-request failures inside a
/// resolver (store down, bad signature) are absorbed into
/// [`Resolution::Denied`] with a reason; the middleware turns every denial
/// into [`crate::Identity::Anonymous`] and nothing else escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token resolved to this principal.
    User(UserRecord),
    /// The token did not resolve. The reason is recorded for logs only; it
    /// must never change the outcome the client observes.
    Denied(DenyReason),
}

impl Resolution {
    /// Returns `true` when the token resolved to a user.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// Why a token failed to resolve.
///
/// Surfaced only in debug-level logs. Keeping the taxonomy internal means a
/// probing client cannot distinguish an unknown token from an expired one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The token is not known to the store.
    UnknownToken,
    /// The token could not be parsed at all.
    Malformed,
    /// The token was valid once and has expired.
    Expired,
    /// The signature did not verify against the configured key.
    InvalidSignature,
    /// The token verified but its claims were rejected (issuer, audience,
    /// missing subject).
    ClaimsRejected,
    /// The principal behind the token has been revoked or deactivated.
    Revoked,
    /// The backing store could not be reached. Still a denial: the request
    /// proceeds anonymously rather than failing.
    StoreUnavailable,
}

impl DenyReason {
    /// Short code for structured log fields.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownToken => "unknown_token",
            Self::Malformed => "malformed",
            Self::Expired => "expired",
            Self::InvalidSignature => "invalid_signature",
            Self::ClaimsRejected => "claims_rejected",
            Self::Revoked => "revoked",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolves an extracted token value to an identity.
///
/// The token passed in has already matched the middleware's pattern and is
/// non-empty. Implementations must be infallible at this boundary: absorb
/// internal errors into [`Resolution::Denied`] (logging them), never panic
/// on request input.
///
/// # Example
///
/// ```rust
/// use warden_core::{BoxFuture, IdentityResolver, Resolution, UserRecord};
///
/// struct Hardcoded;
///
/// impl IdentityResolver for Hardcoded {
///     fn name(&self) -> &'static str {
///         "hardcoded"
///     }
///
///     fn resolve<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Resolution> {
///         Box::pin(async move {
///             if token == "letmein" {
///                 Resolution::User(UserRecord::new("u1"))
///             } else {
///                 Resolution::Denied(warden_core::DenyReason::UnknownToken)
///             }
///         })
///     }
/// }
/// ```
pub trait IdentityResolver: Send + Sync + 'static {
    /// Label used in log fields to identify the resolver.
    fn name(&self) -> &'static str;

    /// Resolves a token. Must not panic; must not block the executor (use a
    /// blocking pool for synchronous work).
    fn resolve<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Resolution>;
}

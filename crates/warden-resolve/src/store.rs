//! Opaque token resolution backed by a token store.
//!
//! An opaque API token carries no information by itself; the only way to
//! learn who it belongs to is to look it up. [`TokenStore`] is the seam for
//! that lookup, and [`StoreTokenResolver`] adapts any store into an
//! [`IdentityResolver`] that the authentication middleware can drive.
//!
//! Two store implementations ship with the crate: [`MemoryTokenStore`] for
//! tests and small deployments, and [`BlockingTokenStore`] for wrapping a
//! synchronous lookup (an ORM call, a file read) so it runs on the blocking
//! worker pool instead of stalling the async executor.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use warden_core::{BoxFuture, DenyReason, IdentityResolver, Resolution, UserRecord};

/// Error raised by a [`TokenStore`] lookup.
///
/// A store error means the lookup could not be completed, not that the token
/// was absent. The resolver layer turns it into a denial without exposing the
/// failure to the request.
#[derive(Error, Debug)]
#[error("token store lookup failed: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl StoreError {
    /// Creates a store error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error carrying an underlying cause.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// A stored token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// The token value as presented by clients.
    pub key: String,
    /// The owning user.
    pub user: UserRecord,
}

impl TokenRecord {
    /// Creates a record binding `key` to `user`.
    #[must_use]
    pub fn new(key: impl Into<String>, user: UserRecord) -> Self {
        Self {
            key: key.into(),
            user,
        }
    }
}

/// Lookup seam for opaque API tokens.
///
/// Implementations return `Ok(None)` for a token that does not exist and
/// reserve `Err` for infrastructure failures. The distinction matters for
/// logging; callers of the middleware see neither.
pub trait TokenStore: Send + Sync + 'static {
    /// Looks up `key`, returning the matching record if one exists.
    fn find_token<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<TokenRecord>, StoreError>>;
}

/// Resolves opaque tokens through a [`TokenStore`].
///
/// A found record resolves to its user in a single store round trip. A
/// missing token denies with [`DenyReason::UnknownToken`]; a store failure is
/// logged and denies with [`DenyReason::StoreUnavailable`].
pub struct StoreTokenResolver {
    store: Arc<dyn TokenStore>,
}

impl StoreTokenResolver {
    /// Creates a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl IdentityResolver for StoreTokenResolver {
    fn name(&self) -> &'static str {
        "opaque_token"
    }

    fn resolve<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            match self.store.find_token(token).await {
                Ok(Some(record)) => Resolution::User(record.user),
                Ok(None) => Resolution::Denied(DenyReason::UnknownToken),
                Err(error) => {
                    tracing::warn!(error = %error, "token store lookup failed");
                    Resolution::Denied(DenyReason::StoreUnavailable)
                }
            }
        })
    }
}

/// In-memory token store.
///
/// Interior mutability lets tokens be inserted and removed while the store is
/// shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, TokenRecord>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a token for `user`, replacing any previous record under `key`.
    pub fn insert(&self, key: impl Into<String>, user: UserRecord) {
        let key = key.into();
        let record = TokenRecord::new(key.clone(), user);
        self.tokens.write().insert(key, record);
    }

    /// Removes a token, returning its record if it was present.
    pub fn remove(&self, key: &str) -> Option<TokenRecord> {
        self.tokens.write().remove(key)
    }

    /// Returns the number of stored tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// Returns `true` if no tokens are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn find_token<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<TokenRecord>, StoreError>> {
        let found = self.tokens.read().get(key).cloned();
        Box::pin(std::future::ready(Ok(found)))
    }
}

/// Wraps a synchronous lookup so it runs on the blocking worker pool.
///
/// The closure is executed via [`tokio::task::spawn_blocking`], keeping slow
/// or blocking lookups off the async executor threads.
pub struct BlockingTokenStore<F> {
    lookup: Arc<F>,
}

impl<F> BlockingTokenStore<F>
where
    F: Fn(&str) -> Result<Option<TokenRecord>, StoreError> + Send + Sync + 'static,
{
    /// Creates a store around a synchronous `lookup`.
    #[must_use]
    pub fn new(lookup: F) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

impl<F> TokenStore for BlockingTokenStore<F>
where
    F: Fn(&str) -> Result<Option<TokenRecord>, StoreError> + Send + Sync + 'static,
{
    fn find_token<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<TokenRecord>, StoreError>> {
        let lookup = Arc::clone(&self.lookup);
        let key = key.to_owned();
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || lookup(&key)).await {
                Ok(result) => result,
                Err(error) => Err(StoreError::with_source(
                    "blocking lookup task failed",
                    error,
                )),
            }
        })
    }
}

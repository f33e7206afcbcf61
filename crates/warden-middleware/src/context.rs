//! Per-request context types.
//!
//! The [`AuthContext`] carries state through the middleware chain: a request
//! id for log correlation, the identity slot that authentication stages
//! write into, and a typed extension map for host-specific request state.

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;
use warden_core::{Identity, IdentitySlot};

/// Unique identifier for a request, used for log correlation.
///
/// # Example
///
/// ```
/// use warden_middleware::RequestId;
///
/// let id = RequestId::new();
/// println!("request id: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh ID using UUID v7.
    ///
    /// UUID v7 incorporates a Unix timestamp, making IDs time-ordered.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps a UUID that arrived from elsewhere.
    ///
    /// Useful when the ID was propagated from an upstream service.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Context that flows through the middleware chain.
///
/// The context is owned by the host (one per request or per WebSocket
/// handshake) and mutated by middleware stages. Authentication stages write
/// the identity slot; handlers read it through [`AuthContext::identity`],
/// which never exposes an absent value.
///
/// # Example
///
/// ```
/// use warden_middleware::context::AuthContext;
/// use warden_core::Identity;
///
/// let mut ctx = AuthContext::new();
/// assert!(ctx.identity().is_anonymous());
///
/// ctx.resolve_identity(Identity::user("user-123"));
/// assert_eq!(ctx.identity().to_string(), "user:user-123");
/// ```
#[derive(Debug)]
pub struct AuthContext {
    /// Identifier stamped on log lines for this request.
    request_id: RequestId,

    /// The identity slot authentication stages resolve into.
    identity: IdentitySlot,

    /// Instant the context was created.
    started_at: Instant,

    /// Type-erased host and middleware state.
    ///
    /// Middleware and hosts can store arbitrary data here using type-safe
    /// keys.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl AuthContext {
    /// Creates a new context with a fresh request ID and an unresolved
    /// identity slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            identity: IdentitySlot::Unresolved,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Creates a context using an externally assigned request ID.
    ///
    /// Useful when the request ID was provided by a client or upstream
    /// service.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            identity: IdentitySlot::Unresolved,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Creates a context whose identity slot is already resolved.
    ///
    /// For hosts whose outer layer (a session middleware, a proxy) has
    /// already authenticated the caller. Token stages short-circuit past a
    /// resolved user, so stacking them behind such a layer is a no-op for
    /// session-authenticated requests.
    #[must_use]
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            request_id: RequestId::new(),
            identity: IdentitySlot::Resolved(identity),
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// The ID assigned to this request.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The identity the handler observes.
    ///
    /// An unresolved slot reads as [`Identity::Anonymous`]; after any
    /// authentication stage has run the slot is always resolved.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        self.identity.current()
    }

    /// Returns the raw identity slot.
    ///
    /// Middleware uses this to distinguish "nobody ran yet" from "ran and
    /// found nobody"; handlers normally want [`AuthContext::identity`].
    #[must_use]
    pub fn identity_slot(&self) -> &IdentitySlot {
        &self.identity
    }

    /// Writes the outcome of an authentication attempt into the slot.
    pub fn resolve_identity(&mut self, identity: Identity) {
        self.identity.resolve(identity);
    }

    /// The instant this context was created.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// How long this request has been in flight.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores an extension value keyed by its type.
    ///
    /// # Example
    ///
    /// ```
    /// use warden_middleware::context::AuthContext;
    ///
    /// #[derive(Clone)]
    /// struct Tenant {
    ///     id: u32,
    /// }
    ///
    /// let mut ctx = AuthContext::new();
    /// ctx.set_extension(Tenant { id: 7 });
    ///
    /// let tenant = ctx.get_extension::<Tenant>().unwrap();
    /// assert_eq!(tenant.id, 7);
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Looks up an extension value by type.
    ///
    /// Returns `None` when nothing of that type has been stored.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Takes an extension value out of the context.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Reports whether an extension of the given type is present.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AuthContext {
    fn clone(&self) -> Self {
        // Extensions are not cloned - they don't implement Clone
        Self {
            request_id: self.request_id,
            identity: self.identity.clone(),
            started_at: self.started_at,
            extensions: HashMap::new(),
        }
    }
}

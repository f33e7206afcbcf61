//! The per-request identity slot.
//!
//! The slot distinguishes "no authentication middleware has run" from
//! "authentication ran and found nobody". The distinction matters for
//! composed middlewares: a stage that resolved Anonymous leaves the door
//! open for a later stage with a different token source, while a resolved
//! user is final.

use crate::identity::Identity;

/// State of the identity slot inside a request context.
///
/// Starts [`IdentitySlot::Unresolved`]; every authentication middleware that
/// runs leaves it [`IdentitySlot::Resolved`], even when the outcome is
/// [`Identity::Anonymous`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentitySlot {
    /// No authentication middleware has processed this request yet.
    #[default]
    Unresolved,
    /// Authentication ran; the value is the outcome.
    Resolved(Identity),
}

impl IdentitySlot {
    /// Returns `true` once any authentication middleware has run.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns `true` when an authentication stage should attempt resolution.
    ///
    /// True for [`IdentitySlot::Unresolved`] and for a resolved
    /// [`Identity::Anonymous`]; a resolved user is never revisited.
    #[must_use]
    pub const fn needs_resolution(&self) -> bool {
        match self {
            Self::Unresolved => true,
            Self::Resolved(identity) => identity.is_anonymous(),
        }
    }

    /// Returns the resolved identity, if any middleware has run.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Resolved(identity) => Some(identity),
            Self::Unresolved => None,
        }
    }

    /// The identity a handler observes right now.
    ///
    /// An unresolved slot reads as [`Identity::Anonymous`] so callers never
    /// see an absent value.
    #[must_use]
    pub const fn current(&self) -> &Identity {
        match self {
            Self::Resolved(identity) => identity,
            Self::Unresolved => &Identity::Anonymous,
        }
    }

    /// Writes the outcome of an authentication attempt.
    pub fn resolve(&mut self, identity: Identity) {
        *self = Self::Resolved(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unresolved() {
        let slot = IdentitySlot::default();
        assert!(!slot.is_resolved());
        assert!(slot.needs_resolution());
        assert!(slot.identity().is_none());
        assert!(slot.current().is_anonymous());
    }

    #[test]
    fn test_resolve_to_user_is_final() {
        let mut slot = IdentitySlot::default();
        slot.resolve(Identity::user("u1"));
        assert!(slot.is_resolved());
        assert!(!slot.needs_resolution());
        assert_eq!(slot.current().to_string(), "user:u1");
    }

    #[test]
    fn test_resolved_anonymous_still_needs_resolution() {
        let mut slot = IdentitySlot::default();
        slot.resolve(Identity::Anonymous);
        assert!(slot.is_resolved());
        assert!(slot.needs_resolution());
        assert!(slot.current().is_anonymous());
    }

    #[test]
    fn test_anonymous_can_be_upgraded() {
        let mut slot = IdentitySlot::default();
        slot.resolve(Identity::Anonymous);
        slot.resolve(Identity::user("u2"));
        assert_eq!(slot.identity(), Some(&Identity::user("u2")));
    }
}

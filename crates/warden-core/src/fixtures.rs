//! Test fixtures for Warden development and testing.
//!
//! Pre-built user records and a canned resolver, shared by tests across the
//! workspace so every crate exercises the same sample principals.
//!
//! # Example
//!
//! ```
//! use warden_core::fixtures;
//!
//! let alice = fixtures::alice();
//! assert_eq!(alice.user_id, "user-alice");
//! ```

use crate::identity::UserRecord;
use crate::resolver::{BoxFuture, DenyReason, IdentityResolver, Resolution};

/// A sample administrator.
#[must_use]
pub fn alice() -> UserRecord {
    UserRecord::new("user-alice")
        .with_name("Alice Example")
        .with_email("alice@example.com")
        .with_roles(["admin"])
}

/// A sample read-only user with no contact details.
#[must_use]
pub fn bob() -> UserRecord {
    UserRecord::new("user-bob").with_roles(["reader"])
}

/// A resolver that returns the same [`Resolution`] for every token.
///
/// Useful for middleware tests that only care about what happens after
/// resolution, not how it was reached.
#[derive(Debug, Clone)]
pub struct FixedResolver {
    outcome: Resolution,
}

impl FixedResolver {
    /// Always resolves to the given user.
    #[must_use]
    pub fn user(record: UserRecord) -> Self {
        Self {
            outcome: Resolution::User(record),
        }
    }

    /// Always denies with the given reason.
    #[must_use]
    pub const fn denied(reason: DenyReason) -> Self {
        Self {
            outcome: Resolution::Denied(reason),
        }
    }
}

impl IdentityResolver for FixedResolver {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn resolve<'a>(&'a self, _token: &'a str) -> BoxFuture<'a, Resolution> {
        Box::pin(std::future::ready(self.outcome.clone()))
    }
}

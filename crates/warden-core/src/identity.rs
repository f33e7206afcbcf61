//! The identity model shared by every Warden crate.
//!
//! [`Identity`] is what authentication produces: either a resolved
//! [`UserRecord`] or the [`Identity::Anonymous`] sentinel. Anonymous is a
//! first-class value, not an error and not `None`; handlers match on it the
//! same way they match on a user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of authenticating one request.
///
/// Serializes with an internal `type` tag so audit logs and downstream
/// services can distinguish the variants:
///
/// ```json
/// {"type":"user","user_id":"u42","roles":["admin"]}
/// {"type":"anonymous"}
/// ```
///
/// # Example
///
/// ```rust
/// use warden_core::Identity;
///
/// let identity = Identity::user("user-123");
/// assert!(!identity.is_anonymous());
/// println!("request from {identity}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Identity {
    /// An authenticated principal.
    User(UserRecord),
    /// No credential, or a credential that did not resolve.
    Anonymous,
}

impl Identity {
    /// Creates a user identity carrying only an identifier.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::User(UserRecord::new(user_id))
    }

    /// Returns `true` for the [`Identity::Anonymous`] sentinel.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Returns the user record if this identity is authenticated.
    #[must_use]
    pub const fn user_record(&self) -> Option<&UserRecord> {
        match self {
            Self::User(record) => Some(record),
            Self::Anonymous => None,
        }
    }

    /// Returns the roles granted to this identity.
    ///
    /// Anonymous carries no roles.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        match self {
            Self::User(record) => &record.roles,
            Self::Anonymous => &[],
        }
    }
}

/// Renders a log-safe identifier: `user:<user_id>` or `anonymous`.
///
/// Never includes names or email addresses, so the output is safe for
/// structured log fields.
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(record) => write!(f, "user:{}", record.user_id),
            Self::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// A resolved principal.
///
/// Resolvers populate this from whatever backs them (a token store row, the
/// claims of a signed token, a user directory). Only `user_id` is required;
/// it must be stable across requests for the same principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable identifier for the principal.
    pub user_id: String,
    /// Human-readable display name, when the backend knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, when the backend knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Roles granted to the principal. Empty means no roles, not anonymous.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl UserRecord {
    /// Creates a record with the given identifier and nothing else.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            email: None,
            roles: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Replaces the role list.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the record carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

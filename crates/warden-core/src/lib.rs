//! # Warden Core
//!
//! Core types and contracts for the Warden authentication middleware.
//!
//! This crate provides the foundational pieces shared by the rest of the
//! workspace:
//!
//! - [`Identity`] / [`UserRecord`] - What authentication produces
//! - [`IdentitySlot`] - The per-request slot middleware writes into
//! - [`IdentityResolver`] / [`Resolution`] - The async token-to-identity seam
//! - [`ConfigError`] - Fail-fast construction errors
//!
//! The middleware machinery lives in `warden-middleware`; ready-made
//! resolvers live in `warden-resolve`.

#![doc(html_root_url = "https://docs.rs/warden-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod fixtures;
mod identity;
mod resolver;
mod slot;

pub use error::ConfigError;
pub use identity::{Identity, UserRecord};
pub use resolver::{BoxFuture, DenyReason, IdentityResolver, Resolution};
pub use slot::IdentitySlot;

//! # Warden Resolve
//!
//! Ready-made [`IdentityResolver`](warden_core::IdentityResolver)
//! implementations for the Warden authentication middleware.
//!
//! Two resolution strategies are provided:
//!
//! - [`StoreTokenResolver`] - opaque API tokens looked up in a [`TokenStore`]
//! - [`JwtResolver`] - signed tokens verified against a configured key
//!
//! Both uphold the same contract: resolution never fails. A token that
//! cannot be verified, is unknown, or hits infrastructure trouble produces a
//! denial, and the middleware turns every denial into the anonymous
//! identity.

#![doc(html_root_url = "https://docs.rs/warden-resolve/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod jwt;
mod store;

pub use jwt::{Claims, ClaimsIdentity, ClaimsResolver, JwtResolver};
pub use store::{
    BlockingTokenStore, MemoryTokenStore, StoreError, StoreTokenResolver, TokenRecord,
    TokenStore,
};

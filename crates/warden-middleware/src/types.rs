//! Common types used throughout the middleware chain.
//!
//! This module re-exports the HTTP request and response types middleware
//! operates on. A WebSocket handshake is an ordinary `GET` request with
//! upgrade headers, so it flows through as a [`Request`] like anything else.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type flowing through the chain.
///
/// A plain `http::Request` carrying a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by handlers.
///
/// A plain `http::Response` carrying a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

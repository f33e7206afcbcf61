//! Signed token (JWT) resolution.
//!
//! Unlike an opaque token, a JWT proves itself: once the signature checks
//! out and the registered claims pass validation, the identity is built
//! straight from the claims without any store round trip. [`JwtResolver`]
//! performs the verification and hands the claims to a [`ClaimsResolver`]
//! for the final mapping, so deployments that need a revocation check or a
//! directory lookup can layer one in.
//!
//! Verification is CPU-bound and runs on the blocking worker pool.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use warden_core::{
    BoxFuture, ConfigError, DenyReason, IdentityResolver, Resolution, UserRecord,
};

/// Claims carried by an accepted token.
///
/// `sub` and `exp` are required; a token without them fails validation
/// before the claims ever reach a [`ClaimsResolver`]. The profile fields are
/// optional and map onto [`UserRecord`] when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, used as the user id.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Granted roles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// Maps verified claims to a resolution.
///
/// Runs only after signature and registered claim validation succeeded, so
/// implementations can trust the claims. Returning a denial here is how a
/// deployment rejects a cryptographically valid token, for example against a
/// revocation list.
pub trait ClaimsResolver: Send + Sync + 'static {
    /// Produces the resolution for `claims`.
    fn resolve_claims<'a>(&'a self, claims: &'a Claims) -> BoxFuture<'a, Resolution>;
}

/// Default claims mapping: the identity is built directly from the claims.
///
/// An empty subject is rejected with [`DenyReason::ClaimsRejected`] since it
/// would otherwise produce a user with no id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsIdentity;

impl ClaimsResolver for ClaimsIdentity {
    fn resolve_claims<'a>(&'a self, claims: &'a Claims) -> BoxFuture<'a, Resolution> {
        let resolution = if claims.sub.is_empty() {
            Resolution::Denied(DenyReason::ClaimsRejected)
        } else {
            let mut user = UserRecord::new(claims.sub.clone())
                .with_roles(claims.roles.iter().cloned());
            if let Some(name) = &claims.name {
                user = user.with_name(name.clone());
            }
            if let Some(email) = &claims.email {
                user = user.with_email(email.clone());
            }
            Resolution::User(user)
        };
        Box::pin(std::future::ready(resolution))
    }
}

/// Resolves signed tokens by verifying them against a configured key.
///
/// The resolver checks the signature, expiry, and any configured issuer or
/// audience restrictions, then delegates the claims-to-identity mapping to
/// its [`ClaimsResolver`]. Every verification failure collapses to a denial;
/// the reason is logged at debug level and never surfaced to the request.
pub struct JwtResolver {
    decoding_key: DecodingKey,
    validation: Validation,
    claims_resolver: Arc<dyn ClaimsResolver>,
}

impl JwtResolver {
    /// Creates a resolver verifying HS256 signatures with a shared secret.
    #[must_use]
    pub fn hs256(secret: &[u8]) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    /// Creates a resolver verifying RS256 signatures with an RSA public key
    /// in PEM format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] if the PEM cannot be parsed.
    pub fn rs256_pem(public_key_pem: &[u8]) -> Result<Self, ConfigError> {
        let key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|error| ConfigError::invalid_key(error.to_string()))?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    fn with_key(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        Self {
            decoding_key,
            validation: Validation::new(algorithm),
            claims_resolver: Arc::new(ClaimsIdentity),
        }
    }

    /// Requires the `iss` claim to equal `issuer`.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.validation.set_issuer(&[issuer.into()]);
        self
    }

    /// Requires the `aud` claim to contain `audience`.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.validation.set_audience(&[audience.into()]);
        self
    }

    /// Sets the clock skew allowance in seconds for `exp` and `nbf` checks.
    #[must_use]
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validation.leeway = seconds;
        self
    }

    /// Replaces the claims-to-identity mapping.
    #[must_use]
    pub fn with_claims_resolver(mut self, claims_resolver: Arc<dyn ClaimsResolver>) -> Self {
        self.claims_resolver = claims_resolver;
        self
    }

    fn deny_reason(error: &jsonwebtoken::errors::Error) -> DenyReason {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::ExpiredSignature => DenyReason::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::ImmatureSignature => DenyReason::InvalidSignature,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::MissingRequiredClaim(_) => DenyReason::ClaimsRejected,
            _ => DenyReason::Malformed,
        }
    }
}

impl fmt::Debug for JwtResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtResolver")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl IdentityResolver for JwtResolver {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn resolve<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let decoding_key = self.decoding_key.clone();
            let validation = self.validation.clone();
            let token = token.to_owned();

            let verified = tokio::task::spawn_blocking(move || {
                decode::<Claims>(&token, &decoding_key, &validation)
            })
            .await;

            match verified {
                Ok(Ok(data)) => self.claims_resolver.resolve_claims(&data.claims).await,
                Ok(Err(error)) => {
                    let reason = Self::deny_reason(&error);
                    tracing::debug!(error = %error, reason = %reason, "token verification failed");
                    Resolution::Denied(reason)
                }
                Err(error) => {
                    tracing::warn!(error = %error, "token verification task failed");
                    Resolution::Denied(DenyReason::StoreUnavailable)
                }
            }
        })
    }
}

//! # eco-auth
//!
//! Request authentication for Ecosphere.
//!
//! Session tokens are Clerk JWTs carried in `Authorization: Bearer` or the
//! `__session` cookie, validated against Clerk's JWKS (`clerk-rs`). The web
//! layer only sees the resulting [`AuthIdentity`], or `None`.

pub mod claims;
pub mod error;
pub mod jwks;
pub mod token;

use std::collections::HashMap;

use axum::http::HeaderMap;
use eco_core::identity::AuthIdentity;

pub use claims::EcoClaims;
pub use error::AuthError;
pub use jwks::SessionVerifier;
pub use token::token_from_headers;

/// Tokens expiring within this many seconds are treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 5;

#[derive(Debug, Clone)]
enum Mode {
    /// No secret key configured; every request is anonymous.
    Disabled,
    Clerk(SessionVerifier),
    /// Fixed token-to-identity table, for tests and local development.
    Fixed(HashMap<String, AuthIdentity>),
}

/// Turns request headers into an identity.
#[derive(Debug, Clone)]
pub struct Authenticator {
    mode: Mode,
}

impl Authenticator {
    /// Validate tokens against Clerk. A missing or blank key disables auth.
    #[must_use]
    pub fn new(secret_key: Option<&str>) -> Self {
        match secret_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Self {
                mode: Mode::Clerk(SessionVerifier::new(key)),
            },
            None => Self::disabled(),
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            mode: Mode::Disabled,
        }
    }

    /// Accept exactly the given tokens, without contacting Clerk.
    #[must_use]
    pub fn fixed(tokens: impl IntoIterator<Item = (String, AuthIdentity)>) -> Self {
        Self {
            mode: Mode::Fixed(tokens.into_iter().collect()),
        }
    }

    /// Whether any token can ever be accepted.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self.mode, Mode::Disabled)
    }

    /// Authenticate a request.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` when the request carries no token,
    /// `AuthError::NotConfigured` when auth is disabled, and
    /// `AuthError::TokenExpired` or `AuthError::JwksValidation` for bad tokens.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthIdentity, AuthError> {
        let token = token_from_headers(headers).ok_or(AuthError::MissingToken)?;
        match &self.mode {
            Mode::Disabled => Err(AuthError::NotConfigured),
            Mode::Fixed(tokens) => tokens
                .get(&token)
                .cloned()
                .ok_or_else(|| AuthError::JwksValidation("unknown token".into())),
            Mode::Clerk(verifier) => {
                let claims = verifier.verify(&token).await?;
                if claims.is_near_expiry(EXPIRY_BUFFER_SECS) {
                    return Err(AuthError::TokenExpired);
                }
                Ok(claims.to_identity())
            }
        }
    }

    /// Like [`Authenticator::authenticate`], with every failure folded into `None`.
    pub async fn identify(&self, headers: &HeaderMap) -> Option<AuthIdentity> {
        match self.authenticate(headers).await {
            Ok(identity) => Some(identity),
            Err(AuthError::MissingToken) => None,
            Err(AuthError::NotConfigured) => {
                tracing::debug!("session token ignored: auth not configured");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected session token");
                None
            }
        }
    }
}

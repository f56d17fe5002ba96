use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clerk_rs::ClerkConfiguration;
use clerk_rs::clerk::Clerk;
use clerk_rs::validators::authorizer::validate_jwt;
use clerk_rs::validators::jwks::MemoryCacheJwksProvider;

use crate::claims::EcoClaims;
use crate::error::AuthError;

/// Verifies session JWTs against the Clerk instance that owns `secret_key`.
///
/// Each verifier keeps its own signing-key cache. The server builds one
/// verifier at startup, so every request shares a cache that refreshes from
/// Clerk when keys expire. Rotating the secret key needs a restart.
#[derive(Clone)]
pub struct SessionVerifier {
    provider: Arc<MemoryCacheJwksProvider>,
}

impl fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionVerifier").finish_non_exhaustive()
    }
}

impl SessionVerifier {
    #[must_use]
    pub fn new(secret_key: &str) -> Self {
        let config = ClerkConfiguration::new(None, None, Some(secret_key.to_string()), None);
        Self {
            provider: Arc::new(MemoryCacheJwksProvider::new(Clerk::new(config))),
        }
    }

    /// Check a session JWT's signature and pull out the claims the site uses.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwksValidation` for a bad signature, an expired
    /// token, or an unreachable key endpoint.
    pub async fn verify(&self, jwt: &str) -> Result<EcoClaims, AuthError> {
        let session = validate_jwt(jwt, Arc::clone(&self.provider))
            .await
            .map_err(|e| AuthError::JwksValidation(e.to_string()))?;

        let org = session.org.as_ref();
        Ok(EcoClaims {
            raw_jwt: jwt.to_string(),
            user_id: session.sub.clone(),
            email: session
                .other
                .get("email")
                .and_then(serde_json::Value::as_str)
                .map(String::from),
            org_id: org.map(|o| o.id.clone()),
            org_slug: org.map(|o| o.slug.clone()),
            org_role: org.map(|o| o.role.clone()),
            expires_at: expiry(i64::from(session.exp))?,
        })
    }
}

fn expiry(exp: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::JwksValidation(format!("invalid exp claim {exp}")))
}

use chrono::{DateTime, Utc};
use eco_core::identity::AuthIdentity;

/// Parsed and validated Clerk session claims.
///
/// Produced by JWKS validation, turned into an [`AuthIdentity`] for the
/// action layer.
#[derive(Debug, Clone)]
pub struct EcoClaims {
    /// Raw JWT string.
    pub raw_jwt: String,
    /// Clerk user ID (`sub` claim).
    pub user_id: String,
    /// `email` claim, present when the session token template adds it.
    pub email: Option<String>,
    /// Organization ID (`org_id` claim). `None` for personal sessions.
    pub org_id: Option<String>,
    /// Organization slug (`org_slug` claim).
    pub org_slug: Option<String>,
    /// Organization role (`org_role` claim, e.g. `"org:admin"`).
    pub org_role: Option<String>,
    /// Token expiration time (from `exp` claim).
    pub expires_at: DateTime<Utc>,
}

impl EcoClaims {
    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            org_id: self.org_id.clone(),
            org_role: self.org_role.clone(),
        }
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authenticated user identity passed from `eco-auth` to the action layer.
///
/// Data only. Validation of the session token happens in `eco-auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthIdentity {
    /// Clerk user ID (JWT `sub` claim). Also the profile row ID.
    pub user_id: String,
    /// Primary email address, when the session token carries one.
    pub email: Option<String>,
    /// Clerk organization ID (`org_id` claim).
    pub org_id: Option<String>,
    /// Clerk organization role (`org_role` claim, e.g. `"org:admin"`).
    pub org_role: Option<String>,
}

impl AuthIdentity {
    /// Identity with only a user ID. Used by tests and the CLI.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            org_id: None,
            org_role: None,
        }
    }
}

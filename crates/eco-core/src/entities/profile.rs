use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProfileRole;

/// Application profile of an authenticated user. `id` is the auth user ID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: ProfileRole,
    pub practitioner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

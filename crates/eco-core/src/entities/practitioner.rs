use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An individual creative practitioner, optionally affiliated with an organization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Practitioner {
    pub id: String,
    pub name: String,
    pub discipline: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub organization_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

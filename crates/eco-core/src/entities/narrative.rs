use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::NarrativeStatus;

/// A story about the ecosystem. Published narratives appear on the public site.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Narrative {
    pub id: String,
    pub title: String,
    pub body: String,
    pub status: NarrativeStatus,
    pub organization_id: Option<String>,
    pub author_id: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

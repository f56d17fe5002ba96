use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EngagementKind;

/// A profile's engagement with an opportunity.
///
/// At most one row exists per `(profile_id, opportunity_id, kind)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Engagement {
    pub id: String,
    pub profile_id: String,
    pub opportunity_id: String,
    pub kind: EngagementKind,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

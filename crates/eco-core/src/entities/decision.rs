use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DecisionStatus;

/// A recorded ecosystem decision (funding round outcome, policy call, ...).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub status: DecisionStatus,
    pub organization_id: Option<String>,
    pub decided_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

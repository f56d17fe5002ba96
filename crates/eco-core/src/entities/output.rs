use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::OutputKind;

/// A produced artifact, optionally derived from a narrative.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Output {
    pub id: String,
    pub title: String,
    pub kind: OutputKind,
    pub url: Option<String>,
    pub narrative_id: Option<String>,
    pub produced_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::OpportunityStatus;

/// A funding opportunity (grant, commission, residency, fellowship).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub funder: Option<String>,
    pub description: Option<String>,
    /// Award amount in minor currency units.
    pub amount_cents: Option<i64>,
    /// ISO 4217 code, e.g. `"USD"`.
    pub currency: String,
    pub deadline: Option<NaiveDate>,
    pub status: OpportunityStatus,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `opportunity_overview` view: an opportunity plus its interest count.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OpportunityOverview {
    pub opportunity: Opportunity,
    pub interest_count: u32,
}

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Money invested into the ecosystem.
///
/// `organization_name` is a denormalized copy that may be absent even when
/// `organization_id` is set; readers resolve the name by point lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Investment {
    pub id: String,
    pub organization_id: Option<String>,
    pub organization_name: Option<String>,
    pub funder: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub invested_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `organization_investment_totals` view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InvestmentTotal {
    pub organization_id: String,
    pub organization_name: String,
    pub investment_count: u32,
    pub total_cents: i64,
}

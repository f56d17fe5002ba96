//! Opportunity repository, including the `opportunity_overview` view.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use eco_core::entities::{Opportunity, OpportunityOverview};
use eco_core::enums::{AuditAction, EntityType, OpportunityStatus};
use eco_core::ids::PREFIX_OPPORTUNITY;

use crate::error::DatabaseError;
use crate::helpers::{
    date_to_sql, get_count, get_opt_string, parse_datetime, parse_enum, parse_optional_date,
    to_json,
};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, title, funder, description, amount_cents, currency, deadline, status, url, created_at, updated_at";

/// Undated opportunities sort after dated ones.
const DEADLINE_ORDER: &str = "deadline IS NULL, deadline ASC, title COLLATE NOCASE";

#[derive(Debug, Clone, Default)]
pub struct NewOpportunity {
    pub title: String,
    pub funder: Option<String>,
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    pub deadline: Option<NaiveDate>,
    /// Defaults to `open`.
    pub status: Option<OpportunityStatus>,
    pub url: Option<String>,
}

fn row_to_opportunity(row: &libsql::Row) -> Result<Opportunity, DatabaseError> {
    Ok(Opportunity {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        funder: get_opt_string(row, 2)?,
        description: get_opt_string(row, 3)?,
        amount_cents: row.get::<Option<i64>>(4)?,
        currency: row.get::<String>(5)?,
        deadline: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        status: parse_enum(&row.get::<String>(7)?)?,
        url: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

fn row_to_overview(row: &libsql::Row) -> Result<OpportunityOverview, DatabaseError> {
    Ok(OpportunityOverview {
        opportunity: row_to_opportunity(row)?,
        interest_count: get_count(row, 11)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Opportunity>, DatabaseError> {
    let mut opportunities = Vec::new();
    while let Some(row) = rows.next().await? {
        opportunities.push(row_to_opportunity(&row)?);
    }
    Ok(opportunities)
}

impl EcoService {
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank title or a negative amount.
    pub async fn create_opportunity(
        &self,
        actor_id: Option<&str>,
        new: &NewOpportunity,
    ) -> Result<Opportunity, DatabaseError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(DatabaseError::InvalidInput("opportunity title is required".into()));
        }
        if new.amount_cents.is_some_and(|a| a < 0) {
            return Err(DatabaseError::InvalidInput("amount cannot be negative".into()));
        }
        let currency = new
            .currency
            .as_deref()
            .map_or_else(|| "USD".to_string(), |c| c.trim().to_ascii_uppercase());
        let status = new.status.unwrap_or(OpportunityStatus::Open);

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_OPPORTUNITY).await?;
        self.db()
            .execute(
                "INSERT INTO opportunities (id, title, funder, description, amount_cents, currency, deadline, status, url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                libsql::params![
                    id.as_str(),
                    title,
                    new.funder.as_deref(),
                    new.description.as_deref(),
                    new.amount_cents,
                    currency.as_str(),
                    date_to_sql(new.deadline),
                    status.as_str(),
                    new.url.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let opportunity = Opportunity {
            id: id.clone(),
            title: title.to_string(),
            funder: new.funder.clone(),
            description: new.description.clone(),
            amount_cents: new.amount_cents,
            currency,
            deadline: new.deadline,
            status,
            url: new.url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.record(
            actor_id,
            EntityType::Opportunity,
            &id,
            AuditAction::Created,
            Some(to_json(&opportunity)?),
        )
        .await?;
        Ok(opportunity)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no opportunity has this ID.
    pub async fn get_opportunity(&self, id: &str) -> Result<Opportunity, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM opportunities WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_opportunity(&row)
    }

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_opportunities(&self, limit: u32) -> Result<Vec<Opportunity>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM opportunities ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );
        collect(self.db().query(&sql, ()).await?).await
    }

    /// Opportunities in one status, soonest deadline first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_opportunities_by_status(
        &self,
        status: OpportunityStatus,
        limit: u32,
    ) -> Result<Vec<Opportunity>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM opportunities WHERE status = ?1
             ORDER BY {DEADLINE_ORDER} LIMIT {limit}"
        );
        collect(self.db().query(&sql, [status.as_str()]).await?).await
    }

    /// Open opportunities whose deadline is `today` or later, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn upcoming_deadlines(
        &self,
        today: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Opportunity>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM opportunities
             WHERE status = 'open' AND deadline IS NOT NULL AND deadline >= ?1
             ORDER BY deadline ASC LIMIT {limit}"
        );
        let today = today.format("%Y-%m-%d").to_string();
        collect(self.db().query(&sql, [today.as_str()]).await?).await
    }

    /// Rows of the `opportunity_overview` view, soonest deadline first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_opportunity_overview(
        &self,
        limit: u32,
    ) -> Result<Vec<OpportunityOverview>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS}, interest_count FROM opportunity_overview
             ORDER BY {DEADLINE_ORDER} LIMIT {limit}"
        );
        let mut rows = self.db().query(&sql, ()).await?;
        let mut overview = Vec::new();
        while let Some(row) = rows.next().await? {
            overview.push(row_to_overview(&row)?);
        }
        Ok(overview)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no opportunity has this ID.
    pub async fn get_opportunity_overview(
        &self,
        id: &str,
    ) -> Result<OpportunityOverview, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS}, interest_count FROM opportunity_overview WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_overview(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_opportunities_by_status(
        &self,
        status: OpportunityStatus,
    ) -> Result<u32, DatabaseError> {
        let count = self
            .db()
            .query_scalar(
                "SELECT COUNT(*) FROM opportunities WHERE status = ?1",
                [status.as_str()],
            )
            .await?;
        u32::try_from(count).map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Set the status of an opportunity. Setting the current status is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no opportunity has this ID.
    pub async fn set_opportunity_status(
        &self,
        actor_id: Option<&str>,
        id: &str,
        status: OpportunityStatus,
    ) -> Result<Opportunity, DatabaseError> {
        let current = self.get_opportunity(id).await?;
        if current.status == status {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .execute(
                "UPDATE opportunities SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), now.to_rfc3339(), id],
            )
            .await?;

        self.record(
            actor_id,
            EntityType::Opportunity,
            id,
            AuditAction::StatusChanged,
            Some(json!({ "from": current.status, "to": status })),
        )
        .await?;

        Ok(Opportunity {
            status,
            updated_at: now,
            ..current
        })
    }
}

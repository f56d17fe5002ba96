//! Decision repository.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use eco_core::entities::Decision;
use eco_core::enums::{AuditAction, DecisionStatus, EntityType};
use eco_core::ids::PREFIX_DECISION;

use crate::error::DatabaseError;
use crate::helpers::{
    date_to_sql, get_opt_string, parse_datetime, parse_enum, parse_optional_date, to_json,
};
use crate::service::EcoService;

const SELECT_COLS: &str =
    "id, title, summary, status, organization_id, decided_on, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct NewDecision {
    pub title: String,
    pub summary: Option<String>,
    /// Defaults to `proposed`.
    pub status: Option<DecisionStatus>,
    pub organization_id: Option<String>,
    pub decided_on: Option<NaiveDate>,
}

fn row_to_decision(row: &libsql::Row) -> Result<Decision, DatabaseError> {
    Ok(Decision {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        summary: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        organization_id: get_opt_string(row, 4)?,
        decided_on: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl EcoService {
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank title or an unknown
    /// organization.
    pub async fn create_decision(
        &self,
        actor_id: Option<&str>,
        new: &NewDecision,
    ) -> Result<Decision, DatabaseError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(DatabaseError::InvalidInput("decision title is required".into()));
        }
        if let Some(org_id) = new.organization_id.as_deref()
            && self.organization_name(org_id).await?.is_none()
        {
            return Err(DatabaseError::InvalidInput(format!(
                "organization '{org_id}' does not exist"
            )));
        }
        let status = new.status.unwrap_or(DecisionStatus::Proposed);

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DECISION).await?;
        self.db()
            .execute(
                "INSERT INTO decisions (id, title, summary, status, organization_id, decided_on, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    id.as_str(),
                    title,
                    new.summary.as_deref(),
                    status.as_str(),
                    new.organization_id.as_deref(),
                    date_to_sql(new.decided_on),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let decision = Decision {
            id: id.clone(),
            title: title.to_string(),
            summary: new.summary.clone(),
            status,
            organization_id: new.organization_id.clone(),
            decided_on: new.decided_on,
            created_at: now,
            updated_at: now,
        };
        self.record(
            actor_id,
            EntityType::Decision,
            &id,
            AuditAction::Created,
            Some(to_json(&decision)?),
        )
        .await?;
        Ok(decision)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no decision has this ID.
    pub async fn get_decision(&self, id: &str) -> Result<Decision, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM decisions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_decision(&row)
    }

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_decisions(&self, limit: u32) -> Result<Vec<Decision>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM decisions ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                ),
                (),
            )
            .await?;
        let mut decisions = Vec::new();
        while let Some(row) = rows.next().await? {
            decisions.push(row_to_decision(&row)?);
        }
        Ok(decisions)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_open_decisions(&self) -> Result<u32, DatabaseError> {
        let count = self
            .db()
            .query_scalar(
                "SELECT COUNT(*) FROM decisions WHERE status IN ('proposed', 'under_review')",
                (),
            )
            .await?;
        u32::try_from(count).map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Move a decision to `status`. Settling a decision stamps `decided_on`
    /// with `today` unless it already has a date. Same status is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no decision has this ID.
    pub async fn set_decision_status(
        &self,
        actor_id: Option<&str>,
        id: &str,
        status: DecisionStatus,
        today: NaiveDate,
    ) -> Result<Decision, DatabaseError> {
        let current = self.get_decision(id).await?;
        if current.status == status {
            return Ok(current);
        }

        let decided_on = if status.is_settled() {
            current.decided_on.or(Some(today))
        } else {
            current.decided_on
        };
        let now = Utc::now();
        self.db()
            .execute(
                "UPDATE decisions SET status = ?1, decided_on = ?2, updated_at = ?3 WHERE id = ?4",
                libsql::params![
                    status.as_str(),
                    date_to_sql(decided_on),
                    now.to_rfc3339(),
                    id
                ],
            )
            .await?;

        self.record(
            actor_id,
            EntityType::Decision,
            id,
            AuditAction::StatusChanged,
            Some(json!({ "from": current.status, "to": status })),
        )
        .await?;

        Ok(Decision {
            status,
            decided_on,
            updated_at: now,
            ..current
        })
    }
}

//! Submission repository: suggestions sent in by signed-in users, reviewed by staff.

use chrono::Utc;
use serde_json::json;

use eco_core::entities::Submission;
use eco_core::enums::{AuditAction, EntityType, SubmissionKind, SubmissionStatus};
use eco_core::ids::PREFIX_SUBMISSION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, kind, title, details, contact_email, status, submitted_by, reviewed_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub kind: SubmissionKind,
    pub title: String,
    pub details: Option<String>,
    pub contact_email: Option<String>,
}

fn row_to_submission(row: &libsql::Row) -> Result<Submission, DatabaseError> {
    Ok(Submission {
        id: row.get::<String>(0)?,
        kind: parse_enum(&row.get::<String>(1)?)?,
        title: row.get::<String>(2)?,
        details: get_opt_string(row, 3)?,
        contact_email: get_opt_string(row, 4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        submitted_by: row.get::<String>(6)?,
        reviewed_by: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl EcoService {
    /// Store a pending submission from `actor_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank title.
    pub async fn create_submission(
        &self,
        actor_id: &str,
        new: &NewSubmission,
    ) -> Result<Submission, DatabaseError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(DatabaseError::InvalidInput("submission title is required".into()));
        }
        let details = new.details.as_deref().map(str::trim).filter(|d| !d.is_empty());
        let contact_email = new
            .contact_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SUBMISSION).await?;
        self.db()
            .execute(
                "INSERT INTO submissions (id, kind, title, details, contact_email, status, submitted_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7, ?7)",
                libsql::params![
                    id.as_str(),
                    new.kind.as_str(),
                    title,
                    details,
                    contact_email,
                    actor_id,
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record(
            Some(actor_id),
            EntityType::Submission,
            &id,
            AuditAction::Created,
            Some(json!({ "kind": new.kind, "title": title })),
        )
        .await?;

        Ok(Submission {
            id,
            kind: new.kind,
            title: title.to_string(),
            details: details.map(String::from),
            contact_email: contact_email.map(String::from),
            status: SubmissionStatus::Pending,
            submitted_by: actor_id.to_string(),
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no submission has this ID.
    pub async fn get_submission(&self, id: &str) -> Result<Submission, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM submissions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_submission(&row)
    }

    /// Newest first, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_submissions(
        &self,
        status: Option<SubmissionStatus>,
        limit: u32,
    ) -> Result<Vec<Submission>, DatabaseError> {
        let mut rows = match status {
            Some(status) => {
                self.db()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM submissions WHERE status = ?1
                             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                        ),
                        [status.as_str()],
                    )
                    .await?
            }
            None => {
                self.db()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM submissions
                             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                        ),
                        (),
                    )
                    .await?
            }
        };
        let mut submissions = Vec::new();
        while let Some(row) = rows.next().await? {
            submissions.push(row_to_submission(&row)?);
        }
        Ok(submissions)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_pending_submissions(&self) -> Result<u32, DatabaseError> {
        let count = self
            .db()
            .query_scalar("SELECT COUNT(*) FROM submissions WHERE status = 'pending'", ())
            .await?;
        u32::try_from(count).map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Record a review outcome. The reviewer is stored in `reviewed_by`;
    /// moving back to `pending` clears it. Same status is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no submission has this ID.
    pub async fn set_submission_status(
        &self,
        actor_id: &str,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<Submission, DatabaseError> {
        let current = self.get_submission(id).await?;
        if current.status == status {
            return Ok(current);
        }

        let reviewed_by = (status != SubmissionStatus::Pending).then(|| actor_id.to_string());
        let now = Utc::now();
        self.db()
            .execute(
                "UPDATE submissions SET status = ?1, reviewed_by = ?2, updated_at = ?3 WHERE id = ?4",
                libsql::params![status.as_str(), reviewed_by.as_deref(), now.to_rfc3339(), id],
            )
            .await?;

        self.record(
            Some(actor_id),
            EntityType::Submission,
            id,
            AuditAction::StatusChanged,
            Some(json!({ "from": current.status, "to": status })),
        )
        .await?;

        Ok(Submission {
            status,
            reviewed_by,
            updated_at: now,
            ..current
        })
    }
}

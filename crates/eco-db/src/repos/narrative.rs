//! Narrative repository. Only published narratives reach the public site.

use chrono::Utc;
use serde_json::json;

use eco_core::entities::Narrative;
use eco_core::enums::{AuditAction, EntityType, NarrativeStatus};
use eco_core::ids::PREFIX_NARRATIVE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, title, body, status, organization_id, author_id, published_at, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct NewNarrative {
    pub title: String,
    pub body: String,
    pub organization_id: Option<String>,
    /// Profile ID of the author.
    pub author_id: Option<String>,
}

fn row_to_narrative(row: &libsql::Row) -> Result<Narrative, DatabaseError> {
    Ok(Narrative {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        body: row.get::<String>(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        organization_id: get_opt_string(row, 4)?,
        author_id: get_opt_string(row, 5)?,
        published_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Narrative>, DatabaseError> {
    let mut narratives = Vec::new();
    while let Some(row) = rows.next().await? {
        narratives.push(row_to_narrative(&row)?);
    }
    Ok(narratives)
}

impl EcoService {
    /// Create a draft narrative.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank title or body.
    pub async fn create_narrative(
        &self,
        actor_id: Option<&str>,
        new: &NewNarrative,
    ) -> Result<Narrative, DatabaseError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(DatabaseError::InvalidInput("narrative title is required".into()));
        }
        if new.body.trim().is_empty() {
            return Err(DatabaseError::InvalidInput("narrative body is required".into()));
        }
        if let Some(author_id) = new.author_id.as_deref() {
            self.ensure_profile(author_id, None).await?;
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_NARRATIVE).await?;
        self.db()
            .execute(
                "INSERT INTO narratives (id, title, body, status, organization_id, author_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 'draft', ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    title,
                    new.body.as_str(),
                    new.organization_id.as_deref(),
                    new.author_id.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record(
            actor_id,
            EntityType::Narrative,
            &id,
            AuditAction::Created,
            Some(json!({ "title": title })),
        )
        .await?;

        Ok(Narrative {
            id,
            title: title.to_string(),
            body: new.body.clone(),
            status: NarrativeStatus::Draft,
            organization_id: new.organization_id.clone(),
            author_id: new.author_id.clone(),
            published_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no narrative has this ID.
    pub async fn get_narrative(&self, id: &str) -> Result<Narrative, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM narratives WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_narrative(&row)
    }

    /// Every narrative, drafts included, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_narratives(&self, limit: u32) -> Result<Vec<Narrative>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM narratives ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );
        collect(self.db().query(&sql, ()).await?).await
    }

    /// Published narratives, most recently published first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_published_narratives(
        &self,
        limit: u32,
    ) -> Result<Vec<Narrative>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM narratives WHERE status = 'published'
             ORDER BY published_at DESC, rowid DESC LIMIT {limit}"
        );
        collect(self.db().query(&sql, ()).await?).await
    }

    /// Publish a draft. Publishing an already published narrative keeps its
    /// original `published_at` and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no narrative has this ID.
    pub async fn publish_narrative(
        &self,
        actor_id: Option<&str>,
        id: &str,
    ) -> Result<Narrative, DatabaseError> {
        let current = self.get_narrative(id).await?;
        if current.status == NarrativeStatus::Published {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .execute(
                "UPDATE narratives SET status = 'published', published_at = ?1, updated_at = ?1 WHERE id = ?2",
                libsql::params![now.to_rfc3339(), id],
            )
            .await?;
        self.record(actor_id, EntityType::Narrative, id, AuditAction::Published, None)
            .await?;

        Ok(Narrative {
            status: NarrativeStatus::Published,
            published_at: Some(now),
            updated_at: now,
            ..current
        })
    }
}

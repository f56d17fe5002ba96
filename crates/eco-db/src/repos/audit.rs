//! Audit trail repository.
//!
//! Append-only entries recording every mutation, read back as the dashboard's
//! activity feed.

use chrono::Utc;

use eco_core::entities::AuditEntry;
use eco_core::enums::{AuditAction, EntityType};
use eco_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, actor_id, entity_type, entity_id, action, detail, created_at";

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get::<String>(0)?,
        actor_id: get_opt_string(row, 1)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get::<String>(3)?,
        action: parse_enum(&row.get::<String>(4)?)?,
        detail: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl EcoService {
    /// Append an audit entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        self.db()
            .execute(
                "INSERT INTO audit_trail (id, actor_id, entity_type, entity_id, action, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    entry.id.as_str(),
                    entry.actor_id.as_deref(),
                    entry.entity_type.as_str(),
                    entry.entity_id.as_str(),
                    entry.action.as_str(),
                    entry.detail.as_ref().map(ToString::to_string),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Build and append an audit entry for a mutation that just happened.
    pub(crate) async fn record(
        &self,
        actor_id: Option<&str>,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        let id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id,
            actor_id: actor_id.map(String::from),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            detail,
            created_at: Utc::now(),
        })
        .await
    }

    /// Most recent audit entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn recent_audit(&self, limit: u32) -> Result<Vec<AuditEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM audit_trail ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );
        let mut rows = self.db().query(&sql, ()).await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }

    /// Audit history of one entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn audit_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM audit_trail
             WHERE entity_type = ?1 AND entity_id = ?2
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut rows = self
            .db()
            .query(&sql, libsql::params![entity_type.as_str(), entity_id])
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;

    #[tokio::test]
    async fn record_and_read_back() {
        let svc = test_service().await;
        svc.record(
            Some("user_1"),
            EntityType::Decision,
            "dec-00000001",
            AuditAction::StatusChanged,
            Some(serde_json::json!({ "from": "proposed", "to": "approved" })),
        )
        .await
        .unwrap();

        let entries = svc.recent_audit(10).await.unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert!(entry.id.starts_with("aud-"));
        assert_eq!(entry.actor_id.as_deref(), Some("user_1"));
        assert_eq!(entry.action, AuditAction::StatusChanged);
        assert_eq!(entry.detail.as_ref().unwrap()["to"], "approved");
    }

    #[tokio::test]
    async fn recent_audit_respects_limit_and_order() {
        let svc = test_service().await;
        for i in 0..5 {
            svc.record(
                None,
                EntityType::Organization,
                &format!("org-{i:08}"),
                AuditAction::Created,
                None,
            )
            .await
            .unwrap();
        }
        let entries = svc.recent_audit(3).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].entity_id, "org-00000004");
    }

    #[tokio::test]
    async fn audit_for_entity_filters() {
        let svc = test_service().await;
        svc.record(None, EntityType::Opportunity, "opp-a", AuditAction::Created, None)
            .await
            .unwrap();
        svc.record(None, EntityType::Opportunity, "opp-b", AuditAction::Created, None)
            .await
            .unwrap();
        let entries = svc
            .audit_for_entity(EntityType::Opportunity, "opp-a")
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_id, "opp-a");
    }
}

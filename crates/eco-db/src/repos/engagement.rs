//! Engagement repository: profiles expressing interest in opportunities.
//!
//! Expressing interest is idempotent. The `(profile_id, opportunity_id, kind)`
//! unique key means a repeat call leaves the table unchanged and returns the
//! row that already exists.

use chrono::Utc;
use serde_json::json;

use eco_core::entities::Engagement;
use eco_core::enums::{AuditAction, EngagementKind, EntityType};
use eco_core::ids::PREFIX_ENGAGEMENT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, profile_id, opportunity_id, kind, note, created_at";

fn row_to_engagement(row: &libsql::Row) -> Result<Engagement, DatabaseError> {
    Ok(Engagement {
        id: row.get::<String>(0)?,
        profile_id: row.get::<String>(1)?,
        opportunity_id: row.get::<String>(2)?,
        kind: parse_enum(&row.get::<String>(3)?)?,
        note: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Engagement>, DatabaseError> {
    let mut engagements = Vec::new();
    while let Some(row) = rows.next().await? {
        engagements.push(row_to_engagement(&row)?);
    }
    Ok(engagements)
}

impl EcoService {
    /// Record that `profile_id` is interested in `opportunity_id`.
    ///
    /// Returns the engagement and whether it was created by this call. The
    /// profile row is created on demand. Only a newly created engagement is
    /// audited.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the opportunity does not exist.
    pub async fn express_interest(
        &self,
        profile_id: &str,
        opportunity_id: &str,
        note: Option<&str>,
    ) -> Result<(Engagement, bool), DatabaseError> {
        self.get_opportunity(opportunity_id).await?;
        self.ensure_profile(profile_id, None).await?;

        let kind = EngagementKind::Interest;
        let id = self.db().generate_id(PREFIX_ENGAGEMENT).await?;
        let note = note.map(str::trim).filter(|n| !n.is_empty());
        let inserted = self
            .db()
            .execute(
                "INSERT OR IGNORE INTO engagements (id, profile_id, opportunity_id, kind, note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    profile_id,
                    opportunity_id,
                    kind.as_str(),
                    note,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        let engagement = self
            .find_engagement(profile_id, opportunity_id, kind)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        let created = inserted > 0;

        if created {
            self.record(
                Some(profile_id),
                EntityType::Engagement,
                &engagement.id,
                AuditAction::Created,
                Some(json!({ "opportunity_id": opportunity_id, "kind": kind })),
            )
            .await?;
        } else {
            tracing::debug!(profile_id, opportunity_id, "interest already recorded");
        }
        Ok((engagement, created))
    }

    /// Remove an interest. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the DELETE fails.
    pub async fn withdraw_interest(
        &self,
        profile_id: &str,
        opportunity_id: &str,
    ) -> Result<bool, DatabaseError> {
        let Some(existing) = self
            .find_engagement(profile_id, opportunity_id, EngagementKind::Interest)
            .await?
        else {
            return Ok(false);
        };

        self.db()
            .execute("DELETE FROM engagements WHERE id = ?1", [existing.id.as_str()])
            .await?;
        self.record(
            Some(profile_id),
            EntityType::Engagement,
            &existing.id,
            AuditAction::Withdrawn,
            Some(json!({ "opportunity_id": opportunity_id })),
        )
        .await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_engagement(
        &self,
        profile_id: &str,
        opportunity_id: &str,
        kind: EngagementKind,
    ) -> Result<Option<Engagement>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM engagements
                     WHERE profile_id = ?1 AND opportunity_id = ?2 AND kind = ?3"
                ),
                libsql::params![profile_id, opportunity_id, kind.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_engagement(&row)?)),
            None => Ok(None),
        }
    }

    /// Engagements of one profile, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_engagements_for_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<Engagement>, DatabaseError> {
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM engagements WHERE profile_id = ?1
                     ORDER BY created_at DESC"
                ),
                [profile_id],
            )
            .await?;
        collect(rows).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_engagements_for_opportunity(
        &self,
        opportunity_id: &str,
    ) -> Result<Vec<Engagement>, DatabaseError> {
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM engagements WHERE opportunity_id = ?1
                     ORDER BY created_at ASC"
                ),
                [opportunity_id],
            )
            .await?;
        collect(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_opportunity, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_interest_creates_row() {
        let svc = test_service().await;
        let opp = make_opportunity(&svc, "Residency").await;

        let (engagement, created) = svc
            .express_interest("user_a", &opp.id, Some("  keen  "))
            .await
            .unwrap();
        assert!(created);
        assert!(engagement.id.starts_with("eng-"));
        assert_eq!(engagement.note.as_deref(), Some("keen"));
        assert_eq!(engagement.kind, EngagementKind::Interest);
        assert!(svc.get_profile("user_a").await.is_ok(), "profile created on demand");
    }

    #[tokio::test]
    async fn repeat_interest_is_idempotent() {
        let svc = test_service().await;
        let opp = make_opportunity(&svc, "Grant").await;

        let (first, created_first) = svc.express_interest("user_a", &opp.id, None).await.unwrap();
        let (second, created_second) = svc
            .express_interest("user_a", &opp.id, Some("again"))
            .await
            .unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);
        assert_eq!(svc.list_engagements_for_opportunity(&opp.id).await.unwrap().len(), 1);

        let audit = svc.audit_for_entity(EntityType::Engagement, &first.id).await.unwrap();
        assert_eq!(audit.len(), 1);
    }

    #[tokio::test]
    async fn interest_in_missing_opportunity() {
        let svc = test_service().await;
        let result = svc.express_interest("user_a", "opp-missing0", None).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn withdraw_then_express_again() {
        let svc = test_service().await;
        let opp = make_opportunity(&svc, "Fellowship").await;

        svc.express_interest("user_a", &opp.id, None).await.unwrap();
        assert!(svc.withdraw_interest("user_a", &opp.id).await.unwrap());
        assert!(!svc.withdraw_interest("user_a", &opp.id).await.unwrap());
        assert!(svc.list_engagements_for_profile("user_a").await.unwrap().is_empty());

        let (_, created) = svc.express_interest("user_a", &opp.id, None).await.unwrap();
        assert!(created);
    }

    #[tokio::test]
    async fn engagements_per_profile() {
        let svc = test_service().await;
        let a = make_opportunity(&svc, "A").await;
        let b = make_opportunity(&svc, "B").await;
        svc.express_interest("user_a", &a.id, None).await.unwrap();
        svc.express_interest("user_a", &b.id, None).await.unwrap();
        svc.express_interest("user_b", &a.id, None).await.unwrap();

        assert_eq!(svc.list_engagements_for_profile("user_a").await.unwrap().len(), 2);
        assert_eq!(svc.list_engagements_for_opportunity(&a.id).await.unwrap().len(), 2);
    }
}

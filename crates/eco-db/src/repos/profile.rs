//! Profile repository.
//!
//! A profile row is keyed by the auth provider's user ID and created lazily
//! the first time an authenticated user does something.

use chrono::Utc;
use serde_json::json;

use eco_core::entities::Profile;
use eco_core::enums::{AuditAction, EntityType, ProfileRole};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, to_json};
use crate::service::EcoService;
use crate::updates::profile::ProfileUpdate;

const SELECT_COLS: &str = "id, display_name, email, role, practitioner_id, created_at, updated_at";

fn row_to_profile(row: &libsql::Row) -> Result<Profile, DatabaseError> {
    Ok(Profile {
        id: row.get::<String>(0)?,
        display_name: get_opt_string(row, 1)?,
        email: get_opt_string(row, 2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        practitioner_id: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl EcoService {
    /// Return the profile for `user_id`, creating a member profile if none exists.
    ///
    /// An existing profile is returned unchanged, even if `email` differs.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank user ID.
    pub async fn ensure_profile(
        &self,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<Profile, DatabaseError> {
        if user_id.trim().is_empty() {
            return Err(DatabaseError::InvalidInput("user id is required".into()));
        }
        let now = Utc::now().to_rfc3339();
        let inserted = self
            .db()
            .execute(
                "INSERT OR IGNORE INTO profiles (id, email, role, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                libsql::params![user_id, email, ProfileRole::Member.as_str(), now],
            )
            .await?;
        if inserted > 0 {
            tracing::info!(user_id, "created profile");
            self.record(
                Some(user_id),
                EntityType::Profile,
                user_id,
                AuditAction::Created,
                Some(json!({ "email": email })),
            )
            .await?;
        }
        self.get_profile(user_id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no profile has this ID.
    pub async fn get_profile(&self, id: &str) -> Result<Profile, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM profiles WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_profile(&row)
    }

    /// Apply `update` to the actor's own profile.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the profile does not exist, or
    /// `DatabaseError::InvalidInput` when linking an unknown practitioner.
    pub async fn update_profile(
        &self,
        actor_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, DatabaseError> {
        if let Some(Some(practitioner_id)) = update.practitioner_id.as_ref() {
            self.get_practitioner(practitioner_id).await.map_err(|e| {
                if e.is_not_found() {
                    DatabaseError::InvalidInput(format!(
                        "practitioner '{practitioner_id}' does not exist"
                    ))
                } else {
                    e
                }
            })?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref display_name) = update.display_name {
            sets.push(format!("display_name = ?{idx}"));
            params.push(display_name.as_deref().into());
            idx += 1;
        }
        if let Some(ref practitioner_id) = update.practitioner_id {
            sets.push(format!("practitioner_id = ?{idx}"));
            params.push(practitioner_id.as_deref().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_profile(actor_id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(actor_id.into());
        let sql = format!("UPDATE profiles SET {} WHERE id = ?{idx}", sets.join(", "));

        let changed = self
            .db()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        self.record(
            Some(actor_id),
            EntityType::Profile,
            actor_id,
            AuditAction::Updated,
            Some(to_json(&update)?),
        )
        .await?;
        self.get_profile(actor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::practitioner::NewPractitioner;
    use crate::test_support::{make_profile, test_service};
    use crate::updates::profile::ProfileUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn ensure_profile_is_idempotent() {
        let svc = test_service().await;
        let first = svc.ensure_profile("user_2abc", Some("a@example.org")).await.unwrap();
        assert_eq!(first.role, ProfileRole::Member);
        assert_eq!(first.email.as_deref(), Some("a@example.org"));

        let second = svc.ensure_profile("user_2abc", Some("other@example.org")).await.unwrap();
        assert_eq!(second, first);

        let audit = svc.audit_for_entity(EntityType::Profile, "user_2abc").await.unwrap();
        assert_eq!(audit.len(), 1);
    }

    #[tokio::test]
    async fn blank_user_id_rejected() {
        let svc = test_service().await;
        let result = svc.ensure_profile("  ", None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn update_sets_and_clears_fields() {
        let svc = test_service().await;
        let id = make_profile(&svc, "user_a").await;
        let practitioner = svc
            .create_practitioner(
                None,
                &NewPractitioner { name: "Ada Lovelace".into(), ..Default::default() },
            )
            .await
            .unwrap();

        let updated = svc
            .update_profile(
                &id,
                ProfileUpdateBuilder::new()
                    .display_name(Some("Ada".into()))
                    .practitioner_id(Some(practitioner.id.clone()))
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Ada"));
        assert_eq!(updated.practitioner_id.as_deref(), Some(practitioner.id.as_str()));

        let cleared = svc
            .update_profile(&id, ProfileUpdateBuilder::new().practitioner_id(None).build())
            .await
            .unwrap();
        assert_eq!(cleared.practitioner_id, None);
        assert_eq!(cleared.display_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn update_rejects_unknown_practitioner() {
        let svc = test_service().await;
        let id = make_profile(&svc, "user_a").await;
        let result = svc
            .update_profile(
                &id,
                ProfileUpdateBuilder::new().practitioner_id(Some("prc-missing0".into())).build(),
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidInput(_))));
        assert_eq!(svc.get_profile(&id).await.unwrap().practitioner_id, None);
    }

    #[tokio::test]
    async fn update_missing_profile() {
        let svc = test_service().await;
        let result = svc
            .update_profile("user_ghost", ProfileUpdateBuilder::new().display_name(None).build())
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn empty_update_writes_nothing() {
        let svc = test_service().await;
        let id = make_profile(&svc, "user_a").await;
        let before = svc.get_profile(&id).await.unwrap();
        let after = svc.update_profile(&id, ProfileUpdate::default()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn update_keeps_sign_in_email() {
        let svc = test_service().await;
        svc.ensure_profile("user_mail", Some("ada@example.org")).await.unwrap();
        let updated = svc
            .update_profile(
                "user_mail",
                ProfileUpdateBuilder::new().display_name(Some("Ada".into())).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("ada@example.org"));
        assert_eq!(updated.display_name.as_deref(), Some("Ada"));
    }
}

//! Practitioner repository.

use chrono::Utc;

use eco_core::entities::Practitioner;
use eco_core::enums::{AuditAction, EntityType};
use eco_core::ids::PREFIX_PRACTITIONER;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, to_json};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, name, discipline, city, bio, email, website, organization_id, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct NewPractitioner {
    pub name: String,
    pub discipline: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub organization_id: Option<String>,
}

fn row_to_practitioner(row: &libsql::Row) -> Result<Practitioner, DatabaseError> {
    Ok(Practitioner {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        discipline: get_opt_string(row, 2)?,
        city: get_opt_string(row, 3)?,
        bio: get_opt_string(row, 4)?,
        email: get_opt_string(row, 5)?,
        website: get_opt_string(row, 6)?,
        organization_id: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl EcoService {
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank name or an unknown
    /// organization.
    pub async fn create_practitioner(
        &self,
        actor_id: Option<&str>,
        new: &NewPractitioner,
    ) -> Result<Practitioner, DatabaseError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DatabaseError::InvalidInput("practitioner name is required".into()));
        }
        if let Some(org_id) = new.organization_id.as_deref()
            && self.organization_name(org_id).await?.is_none()
        {
            return Err(DatabaseError::InvalidInput(format!("unknown organization '{org_id}'")));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PRACTITIONER).await?;
        self.db()
            .execute(
                "INSERT INTO practitioners (id, name, discipline, city, bio, email, website, organization_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params![
                    id.as_str(),
                    name,
                    new.discipline.as_deref(),
                    new.city.as_deref(),
                    new.bio.as_deref(),
                    new.email.as_deref(),
                    new.website.as_deref(),
                    new.organization_id.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let practitioner = Practitioner {
            id: id.clone(),
            name: name.to_string(),
            discipline: new.discipline.clone(),
            city: new.city.clone(),
            bio: new.bio.clone(),
            email: new.email.clone(),
            website: new.website.clone(),
            organization_id: new.organization_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.record(
            actor_id,
            EntityType::Practitioner,
            &id,
            AuditAction::Created,
            Some(to_json(&practitioner)?),
        )
        .await?;
        Ok(practitioner)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no practitioner has this ID.
    pub async fn get_practitioner(&self, id: &str) -> Result<Practitioner, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM practitioners WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_practitioner(&row)
    }

    /// A practitioner together with the name of their organization, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no practitioner has this ID.
    pub async fn get_practitioner_with_organization(
        &self,
        id: &str,
    ) -> Result<(Practitioner, Option<String>), DatabaseError> {
        let practitioner = self.get_practitioner(id).await?;
        let organization_name = match practitioner.organization_id.as_deref() {
            Some(org_id) => self.organization_name(org_id).await?,
            None => None,
        };
        Ok((practitioner, organization_name))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_practitioners(&self, limit: u32) -> Result<Vec<Practitioner>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM practitioners ORDER BY name COLLATE NOCASE LIMIT {limit}"
        );
        let mut rows = self.db().query(&sql, ()).await?;
        let mut practitioners = Vec::new();
        while let Some(row) = rows.next().await? {
            practitioners.push(row_to_practitioner(&row)?);
        }
        Ok(practitioners)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_practitioners_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<Practitioner>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM practitioners WHERE organization_id = ?1
             ORDER BY name COLLATE NOCASE"
        );
        let mut rows = self.db().query(&sql, [organization_id]).await?;
        let mut practitioners = Vec::new();
        while let Some(row) = rows.next().await? {
            practitioners.push(row_to_practitioner(&row)?);
        }
        Ok(practitioners)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_practitioners(&self) -> Result<u32, DatabaseError> {
        let count = self
            .db()
            .query_scalar("SELECT COUNT(*) FROM practitioners", ())
            .await?;
        u32::try_from(count).map_err(|e| DatabaseError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_organization, test_service};

    #[tokio::test]
    async fn create_and_resolve_organization_name() {
        let svc = test_service().await;
        let org = make_organization(&svc, "Harbor Sound").await;
        let prc = svc
            .create_practitioner(
                None,
                &NewPractitioner {
                    name: "Mina Okafor".into(),
                    discipline: Some("sound design".into()),
                    organization_id: Some(org.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(prc.id.starts_with("prc-"));

        let (fetched, org_name) = svc.get_practitioner_with_organization(&prc.id).await.unwrap();
        assert_eq!(fetched.name, "Mina Okafor");
        assert_eq!(org_name.as_deref(), Some("Harbor Sound"));
    }

    #[tokio::test]
    async fn unaffiliated_practitioner_has_no_organization_name() {
        let svc = test_service().await;
        let prc = svc
            .create_practitioner(None, &NewPractitioner { name: "Solo".into(), ..Default::default() })
            .await
            .unwrap();
        let (_, org_name) = svc.get_practitioner_with_organization(&prc.id).await.unwrap();
        assert!(org_name.is_none());
    }

    #[tokio::test]
    async fn unknown_organization_is_rejected() {
        let svc = test_service().await;
        let err = svc
            .create_practitioner(
                None,
                &NewPractitioner {
                    name: "Lost".into(),
                    organization_id: Some("org-00000000".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn list_for_organization_filters() {
        let svc = test_service().await;
        let org = make_organization(&svc, "Kiln").await;
        for (name, org_id) in [("A", Some(org.id.clone())), ("B", None), ("C", Some(org.id.clone()))] {
            svc.create_practitioner(
                None,
                &NewPractitioner { name: name.into(), organization_id: org_id, ..Default::default() },
            )
            .await
            .unwrap();
        }
        let members = svc.list_practitioners_for_organization(&org.id).await.unwrap();
        let names: Vec<_> = members.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(svc.count_practitioners().await.unwrap(), 3);
        assert_eq!(svc.list_practitioners(10).await.unwrap().len(), 3);
    }
}

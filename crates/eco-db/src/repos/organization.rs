//! Organization repository.

use chrono::Utc;

use eco_core::entities::Organization;
use eco_core::enums::{AuditAction, EntityType};
use eco_core::ids::PREFIX_ORGANIZATION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, to_json};
use crate::service::EcoService;

const SELECT_COLS: &str =
    "id, name, sector, city, description, website, founded_year, created_at, updated_at";

/// Fields for a new organization row.
#[derive(Debug, Clone, Default)]
pub struct NewOrganization {
    pub name: String,
    pub sector: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub founded_year: Option<i32>,
}

fn row_to_organization(row: &libsql::Row) -> Result<Organization, DatabaseError> {
    let founded_year = row
        .get::<Option<i64>>(6)?
        .map(i32::try_from)
        .transpose()
        .map_err(|e| DatabaseError::Query(format!("founded_year out of range: {e}")))?;
    Ok(Organization {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        sector: get_opt_string(row, 2)?,
        city: get_opt_string(row, 3)?,
        description: get_opt_string(row, 4)?,
        website: get_opt_string(row, 5)?,
        founded_year,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl EcoService {
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank name, or the
    /// underlying error if the INSERT fails.
    pub async fn create_organization(
        &self,
        actor_id: Option<&str>,
        new: &NewOrganization,
    ) -> Result<Organization, DatabaseError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DatabaseError::InvalidInput("organization name is required".into()));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ORGANIZATION).await?;

        self.db()
            .execute(
                "INSERT INTO organizations (id, name, sector, city, description, website, founded_year, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    name,
                    new.sector.as_deref(),
                    new.city.as_deref(),
                    new.description.as_deref(),
                    new.website.as_deref(),
                    new.founded_year.map(i64::from),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let organization = Organization {
            id: id.clone(),
            name: name.to_string(),
            sector: new.sector.clone(),
            city: new.city.clone(),
            description: new.description.clone(),
            website: new.website.clone(),
            founded_year: new.founded_year,
            created_at: now,
            updated_at: now,
        };

        self.record(
            actor_id,
            EntityType::Organization,
            &id,
            AuditAction::Created,
            Some(to_json(&organization)?),
        )
        .await?;

        Ok(organization)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no organization has this ID.
    pub async fn get_organization(&self, id: &str) -> Result<Organization, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM organizations WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_organization(&row)
    }

    /// Organizations ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_organizations(&self, limit: u32) -> Result<Vec<Organization>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM organizations ORDER BY name COLLATE NOCASE LIMIT {limit}"
        );
        let mut rows = self.db().query(&sql, ()).await?;
        let mut organizations = Vec::new();
        while let Some(row) = rows.next().await? {
            organizations.push(row_to_organization(&row)?);
        }
        Ok(organizations)
    }

    /// Point lookup of an organization's name, for resolving foreign keys.
    ///
    /// Returns `Ok(None)` when the row does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn organization_name(&self, id: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .query("SELECT name FROM organizations WHERE id = ?1", [id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_organizations(&self) -> Result<u32, DatabaseError> {
        let count = self
            .db()
            .query_scalar("SELECT COUNT(*) FROM organizations", ())
            .await?;
        u32::try_from(count).map_err(|e| DatabaseError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_organization_roundtrip() {
        let svc = test_service().await;
        let org = svc
            .create_organization(
                Some("user_staff"),
                &NewOrganization {
                    name: "  Riverside Print Studio ".into(),
                    sector: Some("design".into()),
                    city: Some("Kingston".into()),
                    founded_year: Some(2011),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(org.id.starts_with("org-"));
        assert_eq!(org.name, "Riverside Print Studio");

        let fetched = svc.get_organization(&org.id).await.unwrap();
        assert_eq!(fetched, org);
        assert_eq!(fetched.founded_year, Some(2011));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let svc = test_service().await;
        let err = svc
            .create_organization(None, &NewOrganization::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidInput(_)));
        assert_eq!(svc.count_organizations().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_missing_organization() {
        let svc = test_service().await;
        let result = svc.get_organization("org-deadbeef").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn list_is_alphabetical_and_limited() {
        let svc = test_service().await;
        for name in ["zeta works", "Alpha Hall", "midtown makers"] {
            svc.create_organization(None, &NewOrganization { name: name.into(), ..Default::default() })
                .await
                .unwrap();
        }
        let names: Vec<String> = svc
            .list_organizations(2)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["Alpha Hall", "midtown makers"]);
        assert_eq!(svc.count_organizations().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn organization_name_lookup() {
        let svc = test_service().await;
        let org = svc
            .create_organization(None, &NewOrganization { name: "Foundry".into(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(svc.organization_name(&org.id).await.unwrap().as_deref(), Some("Foundry"));
        assert_eq!(svc.organization_name("org-missing0").await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_is_audited() {
        let svc = test_service().await;
        let org = svc
            .create_organization(Some("user_a"), &NewOrganization { name: "Loom".into(), ..Default::default() })
            .await
            .unwrap();
        let audit = svc.audit_for_entity(EntityType::Organization, &org.id).await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::Created);
        assert_eq!(audit[0].actor_id.as_deref(), Some("user_a"));
    }
}

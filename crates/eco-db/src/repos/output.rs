//! Output repository.

use chrono::{NaiveDate, Utc};

use eco_core::entities::Output;
use eco_core::enums::{AuditAction, EntityType, OutputKind};
use eco_core::ids::PREFIX_OUTPUT;

use crate::error::DatabaseError;
use crate::helpers::{
    date_to_sql, get_opt_string, parse_datetime, parse_enum, parse_optional_date, to_json,
};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, title, kind, url, narrative_id, produced_on, created_at";

#[derive(Debug, Clone)]
pub struct NewOutput {
    pub title: String,
    pub kind: OutputKind,
    pub url: Option<String>,
    pub narrative_id: Option<String>,
    pub produced_on: Option<NaiveDate>,
}

fn row_to_output(row: &libsql::Row) -> Result<Output, DatabaseError> {
    Ok(Output {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        url: get_opt_string(row, 3)?,
        narrative_id: get_opt_string(row, 4)?,
        produced_on: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Output>, DatabaseError> {
    let mut outputs = Vec::new();
    while let Some(row) = rows.next().await? {
        outputs.push(row_to_output(&row)?);
    }
    Ok(outputs)
}

impl EcoService {
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a blank title or an unknown
    /// narrative.
    pub async fn create_output(
        &self,
        actor_id: Option<&str>,
        new: &NewOutput,
    ) -> Result<Output, DatabaseError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(DatabaseError::InvalidInput("output title is required".into()));
        }
        if let Some(narrative_id) = new.narrative_id.as_deref() {
            self.get_narrative(narrative_id).await.map_err(|e| {
                if e.is_not_found() {
                    DatabaseError::InvalidInput(format!("narrative '{narrative_id}' does not exist"))
                } else {
                    e
                }
            })?;
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_OUTPUT).await?;
        self.db()
            .execute(
                "INSERT INTO outputs (id, title, kind, url, narrative_id, produced_on, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    title,
                    new.kind.as_str(),
                    new.url.as_deref(),
                    new.narrative_id.as_deref(),
                    date_to_sql(new.produced_on),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let output = Output {
            id: id.clone(),
            title: title.to_string(),
            kind: new.kind,
            url: new.url.clone(),
            narrative_id: new.narrative_id.clone(),
            produced_on: new.produced_on,
            created_at: now,
        };
        self.record(
            actor_id,
            EntityType::Output,
            &id,
            AuditAction::Created,
            Some(to_json(&output)?),
        )
        .await?;
        Ok(output)
    }

    /// Most recently produced first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_outputs(&self, limit: u32) -> Result<Vec<Output>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM outputs
             ORDER BY produced_on IS NULL, produced_on DESC, created_at DESC LIMIT {limit}"
        );
        collect(self.db().query(&sql, ()).await?).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_outputs_for_narrative(
        &self,
        narrative_id: &str,
    ) -> Result<Vec<Output>, DatabaseError> {
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM outputs WHERE narrative_id = ?1
                     ORDER BY produced_on IS NULL, produced_on DESC, created_at DESC"
                ),
                [narrative_id],
            )
            .await?;
        collect(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::narrative::NewNarrative;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;

    fn output(title: &str, kind: OutputKind, produced_on: Option<NaiveDate>) -> NewOutput {
        NewOutput {
            title: title.into(),
            kind,
            url: None,
            narrative_id: None,
            produced_on,
        }
    }

    #[tokio::test]
    async fn create_and_list_by_date() {
        let svc = test_service().await;
        let d = |m| NaiveDate::from_ymd_opt(2026, m, 1);
        svc.create_output(None, &output("Old report", OutputKind::Report, d(1))).await.unwrap();
        svc.create_output(None, &output("Undated", OutputKind::Other, None)).await.unwrap();
        let newest = svc
            .create_output(None, &output("Podcast ep 3", OutputKind::Podcast, d(3)))
            .await
            .unwrap();
        assert!(newest.id.starts_with("out-"));

        let titles: Vec<String> = svc
            .list_outputs(10)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.title)
            .collect();
        assert_eq!(titles, vec!["Podcast ep 3", "Old report", "Undated"]);
    }

    #[tokio::test]
    async fn outputs_linked_to_narrative() {
        let svc = test_service().await;
        let narrative = svc
            .create_narrative(
                None,
                &NewNarrative { title: "Makers".into(), body: "Story".into(), ..Default::default() },
            )
            .await
            .unwrap();
        svc.create_output(
            None,
            &NewOutput { narrative_id: Some(narrative.id.clone()), ..output("Film", OutputKind::Video, None) },
        )
        .await
        .unwrap();
        svc.create_output(None, &output("Unrelated", OutputKind::Article, None)).await.unwrap();

        let linked = svc.list_outputs_for_narrative(&narrative.id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].kind, OutputKind::Video);
    }

    #[tokio::test]
    async fn unknown_narrative_rejected() {
        let svc = test_service().await;
        let result = svc
            .create_output(
                None,
                &NewOutput { narrative_id: Some("nar-missing0".into()), ..output("X", OutputKind::Report, None) },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidInput(_))));
    }
}

//! Investment repository and the `organization_investment_totals` view.
//!
//! Investments carry a denormalized `organization_name` that older rows may
//! lack. Readers fill it by point lookup on the organization, caching names
//! for the duration of one call.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use eco_core::entities::{Investment, InvestmentTotal};
use eco_core::enums::{AuditAction, EntityType};
use eco_core::ids::PREFIX_INVESTMENT;

use crate::error::DatabaseError;
use crate::helpers::{
    date_to_sql, get_count, get_opt_string, parse_datetime, parse_optional_date, to_json,
};
use crate::service::EcoService;

const SELECT_COLS: &str = "id, organization_id, organization_name, funder, amount_cents, currency, invested_on, description, created_at";

#[derive(Debug, Clone, Default)]
pub struct NewInvestment {
    pub organization_id: Option<String>,
    pub funder: Option<String>,
    pub amount_cents: i64,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    pub invested_on: Option<NaiveDate>,
    pub description: Option<String>,
}

fn row_to_investment(row: &libsql::Row) -> Result<Investment, DatabaseError> {
    Ok(Investment {
        id: row.get::<String>(0)?,
        organization_id: get_opt_string(row, 1)?,
        organization_name: get_opt_string(row, 2)?,
        funder: get_opt_string(row, 3)?,
        amount_cents: row.get::<i64>(4)?,
        currency: row.get::<String>(5)?,
        invested_on: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        description: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Investment>, DatabaseError> {
    let mut investments = Vec::new();
    while let Some(row) = rows.next().await? {
        investments.push(row_to_investment(&row)?);
    }
    Ok(investments)
}

impl EcoService {
    /// Record an investment. The organization name is copied onto the row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a non-positive amount or an
    /// unknown organization.
    pub async fn create_investment(
        &self,
        actor_id: Option<&str>,
        new: &NewInvestment,
    ) -> Result<Investment, DatabaseError> {
        if new.amount_cents <= 0 {
            return Err(DatabaseError::InvalidInput("amount must be greater than zero".into()));
        }
        let organization_name = match new.organization_id.as_deref() {
            Some(org_id) => Some(self.organization_name(org_id).await?.ok_or_else(|| {
                DatabaseError::InvalidInput(format!("organization '{org_id}' does not exist"))
            })?),
            None => None,
        };
        let currency = new
            .currency
            .as_deref()
            .map_or_else(|| "USD".to_string(), |c| c.trim().to_ascii_uppercase());

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_INVESTMENT).await?;
        self.db()
            .execute(
                "INSERT INTO investments (id, organization_id, organization_name, funder, amount_cents, currency, invested_on, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    new.organization_id.as_deref(),
                    organization_name.as_deref(),
                    new.funder.as_deref(),
                    new.amount_cents,
                    currency.as_str(),
                    date_to_sql(new.invested_on),
                    new.description.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let investment = Investment {
            id: id.clone(),
            organization_id: new.organization_id.clone(),
            organization_name,
            funder: new.funder.clone(),
            amount_cents: new.amount_cents,
            currency,
            invested_on: new.invested_on,
            description: new.description.clone(),
            created_at: now,
        };
        self.record(
            actor_id,
            EntityType::Investment,
            &id,
            AuditAction::Created,
            Some(to_json(&investment)?),
        )
        .await?;
        Ok(investment)
    }

    /// Most recent first, by investment date then creation time.
    ///
    /// Rows come back as stored; see [`EcoService::list_investments_resolved`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_investments(&self, limit: u32) -> Result<Vec<Investment>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM investments
             ORDER BY invested_on IS NULL, invested_on DESC, created_at DESC LIMIT {limit}"
        );
        collect(self.db().query(&sql, ()).await?).await
    }

    /// Like [`EcoService::list_investments`] with organization names filled in.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_investments_resolved(
        &self,
        limit: u32,
    ) -> Result<Vec<Investment>, DatabaseError> {
        let mut investments = self.list_investments(limit).await?;
        self.resolve_organization_names(&mut investments).await?;
        Ok(investments)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_investments_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<Investment>, DatabaseError> {
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM investments WHERE organization_id = ?1
                     ORDER BY invested_on IS NULL, invested_on DESC, created_at DESC"
                ),
                [organization_id],
            )
            .await?;
        collect(rows).await
    }

    /// Fill missing `organization_name` values by looking up each referenced
    /// organization once. Rows whose organization no longer exists keep `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a lookup fails.
    pub async fn resolve_organization_names(
        &self,
        investments: &mut [Investment],
    ) -> Result<(), DatabaseError> {
        let mut cache: HashMap<String, Option<String>> = HashMap::new();
        for investment in investments.iter_mut() {
            if investment.organization_name.is_some() {
                continue;
            }
            let Some(org_id) = investment.organization_id.as_deref() else {
                continue;
            };
            if !cache.contains_key(org_id) {
                let name = self.organization_name(org_id).await?;
                cache.insert(org_id.to_string(), name);
            }
            investment.organization_name = cache.get(org_id).cloned().flatten();
        }
        Ok(())
    }

    /// Per-organization totals, largest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn investment_totals(&self) -> Result<Vec<InvestmentTotal>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                "SELECT organization_id, organization_name, investment_count, total_cents
                 FROM organization_investment_totals
                 ORDER BY total_cents DESC, organization_name COLLATE NOCASE",
                (),
            )
            .await?;
        let mut totals = Vec::new();
        while let Some(row) = rows.next().await? {
            totals.push(InvestmentTotal {
                organization_id: row.get::<String>(0)?,
                organization_name: row.get::<String>(1)?,
                investment_count: get_count(&row, 2)?,
                total_cents: row.get::<i64>(3)?,
            });
        }
        Ok(totals)
    }

    /// Sum of every investment amount, regardless of currency.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn total_investment_cents(&self) -> Result<i64, DatabaseError> {
        self.db()
            .query_scalar("SELECT COALESCE(SUM(amount_cents), 0) FROM investments", ())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_organization, test_service};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invest(org: Option<&str>, amount_cents: i64, on: NaiveDate) -> NewInvestment {
        NewInvestment {
            organization_id: org.map(String::from),
            funder: Some("Arts Council".into()),
            amount_cents,
            invested_on: Some(on),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_copies_organization_name() {
        let svc = test_service().await;
        let org = make_organization(&svc, "Harbour Studios").await;
        let inv = svc
            .create_investment(None, &invest(Some(&org.id), 2_500_000, date(2026, 1, 10)))
            .await
            .unwrap();
        assert!(inv.id.starts_with("inv-"));
        assert_eq!(inv.organization_name.as_deref(), Some("Harbour Studios"));
        assert_eq!(inv.currency, "USD");
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let svc = test_service().await;
        let zero = svc
            .create_investment(None, &invest(None, 0, date(2026, 1, 1)))
            .await;
        assert!(matches!(zero, Err(DatabaseError::InvalidInput(_))));

        let unknown = svc
            .create_investment(None, &invest(Some("org-nope0000"), 100, date(2026, 1, 1)))
            .await;
        assert!(matches!(unknown, Err(DatabaseError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn list_orders_by_date_desc() {
        let svc = test_service().await;
        svc.create_investment(None, &invest(None, 100, date(2025, 5, 1))).await.unwrap();
        svc.create_investment(None, &invest(None, 200, date(2026, 2, 1))).await.unwrap();
        svc.create_investment(None, &invest(None, 300, date(2025, 11, 1))).await.unwrap();

        let amounts: Vec<i64> = svc
            .list_investments(10)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.amount_cents)
            .collect();
        assert_eq!(amounts, vec![200, 300, 100]);
        assert_eq!(svc.total_investment_cents().await.unwrap(), 600);
    }

    #[tokio::test]
    async fn missing_names_resolved_by_lookup() {
        let svc = test_service().await;
        let org = make_organization(&svc, "Northern Lights Collective").await;
        svc.create_investment(None, &invest(Some(&org.id), 100, date(2026, 1, 1)))
            .await
            .unwrap();
        svc.create_investment(None, &invest(Some(&org.id), 200, date(2026, 1, 2)))
            .await
            .unwrap();
        // Simulate rows written before the name was denormalized.
        svc.db()
            .execute("UPDATE investments SET organization_name = NULL", ())
            .await
            .unwrap();

        let raw = svc.list_investments(10).await.unwrap();
        assert!(raw.iter().all(|i| i.organization_name.is_none()));

        let resolved = svc.list_investments_resolved(10).await.unwrap();
        assert!(
            resolved
                .iter()
                .all(|i| i.organization_name.as_deref() == Some("Northern Lights Collective"))
        );
    }

    #[tokio::test]
    async fn totals_per_organization() {
        let svc = test_service().await;
        let big = make_organization(&svc, "Big Venue").await;
        let small = make_organization(&svc, "Small Press").await;
        make_organization(&svc, "No Money Yet").await;
        svc.create_investment(None, &invest(Some(&big.id), 1_000, date(2026, 1, 1))).await.unwrap();
        svc.create_investment(None, &invest(Some(&big.id), 4_000, date(2026, 1, 2))).await.unwrap();
        svc.create_investment(None, &invest(Some(&small.id), 700, date(2026, 1, 3))).await.unwrap();

        let totals = svc.investment_totals().await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].organization_name, "Big Venue");
        assert_eq!(totals[0].investment_count, 2);
        assert_eq!(totals[0].total_cents, 5_000);
        assert_eq!(totals[1].total_cents, 700);

        assert_eq!(svc.list_investments_for_organization(&big.id).await.unwrap().len(), 2);
    }
}

//! Demo data for local development.
//!
//! `ecos seed` loads this into an empty database so every dashboard page has
//! something to show. Writes go through the normal repository methods, so the
//! audit trail fills up too.

use chrono::{Days, NaiveDate};

use eco_core::enums::{DecisionStatus, OpportunityStatus, OutputKind};

use crate::error::DatabaseError;
use crate::repos::decision::NewDecision;
use crate::repos::investment::NewInvestment;
use crate::repos::narrative::NewNarrative;
use crate::repos::opportunity::NewOpportunity;
use crate::repos::organization::NewOrganization;
use crate::repos::output::NewOutput;
use crate::repos::practitioner::NewPractitioner;
use crate::service::EcoService;

/// Row counts written by [`EcoService::seed_demo`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub organizations: u32,
    pub practitioners: u32,
    pub opportunities: u32,
    pub investments: u32,
    pub decisions: u32,
    pub narratives: u32,
    pub outputs: u32,
}

const ORGANIZATIONS: &[(&str, &str, &str)] = &[
    ("Harbour Studios", "film", "Recording and post-production studio on the waterfront."),
    ("Northern Lights Collective", "music", "Artist-run collective booking live shows."),
    ("Paper Kite Press", "publishing", "Independent press for local writers."),
];

const PRACTITIONERS: &[(&str, &str, usize)] = &[
    ("Ada Okafor", "sound design", 0),
    ("Mika Lund", "illustration", 2),
    ("Rafael Souza", "live performance", 1),
    ("June Park", "documentary", 0),
];

fn days_from(today: NaiveDate, days: u64) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(days))
}

fn days_before(today: NaiveDate, days: u64) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(days))
}

impl EcoService {
    /// Insert the demo data set. Does nothing if any organization exists.
    ///
    /// Returns `None` when the database was not empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails.
    pub async fn seed_demo(&self, today: NaiveDate) -> Result<Option<SeedSummary>, DatabaseError> {
        if self.count_organizations().await? > 0 {
            tracing::info!("database already has data, skipping seed");
            return Ok(None);
        }
        let mut summary = SeedSummary::default();

        let mut org_ids = Vec::new();
        for (name, sector, description) in ORGANIZATIONS {
            let org = self
                .create_organization(
                    None,
                    &NewOrganization {
                        name: (*name).to_string(),
                        sector: Some((*sector).to_string()),
                        city: Some("Port Ellis".into()),
                        description: Some((*description).to_string()),
                        ..Default::default()
                    },
                )
                .await?;
            org_ids.push(org.id);
            summary.organizations += 1;
        }

        for (name, discipline, org_idx) in PRACTITIONERS {
            self.create_practitioner(
                None,
                &NewPractitioner {
                    name: (*name).to_string(),
                    discipline: Some((*discipline).to_string()),
                    city: Some("Port Ellis".into()),
                    organization_id: org_ids.get(*org_idx).cloned(),
                    ..Default::default()
                },
            )
            .await?;
            summary.practitioners += 1;
        }

        let opportunities = [
            ("Emerging Artist Microgrant", 250_000, days_from(today, 5), OpportunityStatus::Open),
            ("Waterfront Mural Commission", 1_800_000, days_from(today, 21), OpportunityStatus::Open),
            ("Writers' Residency", 600_000, None, OpportunityStatus::Open),
            ("Touring Support Fund", 1_000_000, days_before(today, 10), OpportunityStatus::Closed),
        ];
        for (title, amount_cents, deadline, status) in opportunities {
            self.create_opportunity(
                None,
                &NewOpportunity {
                    title: title.to_string(),
                    funder: Some("Port Ellis Arts Council".into()),
                    amount_cents: Some(amount_cents),
                    deadline,
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
            summary.opportunities += 1;
        }

        let investments = [(0, 2_500_000, 40), (0, 750_000, 200), (1, 1_200_000, 90), (2, 300_000, 15)];
        for (org_idx, amount_cents, days_ago) in investments {
            self.create_investment(
                None,
                &NewInvestment {
                    organization_id: org_ids.get(org_idx).cloned(),
                    funder: Some("Regional Development Fund".into()),
                    amount_cents,
                    invested_on: days_before(today, days_ago),
                    ..Default::default()
                },
            )
            .await?;
            summary.investments += 1;
        }

        let decisions = [
            ("Extend late-night venue licensing", DecisionStatus::UnderReview),
            ("Create a shared rehearsal space", DecisionStatus::Approved),
            ("Pilot a festival ticket levy", DecisionStatus::Proposed),
        ];
        for (title, status) in decisions {
            self.create_decision(
                None,
                &NewDecision {
                    title: title.to_string(),
                    status: Some(status),
                    decided_on: status.is_settled().then_some(today),
                    ..Default::default()
                },
            )
            .await?;
            summary.decisions += 1;
        }

        let narrative = self
            .create_narrative(
                None,
                &NewNarrative {
                    title: "How a warehouse became a music district".into(),
                    body: "Five years ago the Dock Street warehouses were empty. Today they host \
                           rehearsal rooms, two venues, and a record label."
                        .into(),
                    organization_id: org_ids.get(1).cloned(),
                    author_id: None,
                },
            )
            .await?;
        self.publish_narrative(None, &narrative.id).await?;
        self.create_narrative(
            None,
            &NewNarrative {
                title: "Draft: the economics of small presses".into(),
                body: "Notes for an upcoming piece.".into(),
                organization_id: org_ids.get(2).cloned(),
                author_id: None,
            },
        )
        .await?;
        summary.narratives += 2;

        let outputs = [
            ("Dock Street short film", OutputKind::Video, Some(narrative.id.clone())),
            ("Creative economy annual report", OutputKind::Report, None),
        ];
        for (title, kind, narrative_id) in outputs {
            self.create_output(
                None,
                &NewOutput {
                    title: title.to_string(),
                    kind,
                    url: None,
                    narrative_id,
                    produced_on: days_before(today, 30),
                },
            )
            .await?;
            summary.outputs += 1;
        }

        tracing::info!(?summary, "seeded demo data");
        Ok(Some(summary))
    }
}

//! End-to-end repository flows against an in-memory database.
//!
//! - Interest expressed twice by the same profile counts once in the overview
//! - Investments written without a denormalized name resolve through lookups
//! - Status changes land in the activity feed, newest first
//! - A file-backed database keeps its rows across reopen

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use eco_core::enums::{AuditAction, EntityType, OpportunityStatus, SubmissionKind, SubmissionStatus};
use eco_db::repos::investment::NewInvestment;
use eco_db::repos::opportunity::NewOpportunity;
use eco_db::repos::organization::NewOrganization;
use eco_db::repos::submission::NewSubmission;
use eco_db::service::EcoService;

async fn test_service() -> EcoService {
    EcoService::new_local(":memory:", true).await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn repeated_interest_counts_once() {
    let svc = test_service().await;
    let opp = svc
        .create_opportunity(
            None,
            &NewOpportunity {
                title: "Community Arts Grant".into(),
                deadline: Some(date(2026, 11, 30)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for _ in 0..3 {
        svc.express_interest("user_a", &opp.id, None).await.unwrap();
    }
    svc.express_interest("user_b", &opp.id, None).await.unwrap();

    let overview = svc.list_opportunity_overview(10).await.unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].interest_count, 2);
}

#[tokio::test]
async fn investment_names_resolve_after_rename() {
    let svc = test_service().await;
    let org = svc
        .create_organization(
            None,
            &NewOrganization { name: "Old Name Ltd".into(), ..Default::default() },
        )
        .await
        .unwrap();
    svc.create_investment(
        None,
        &NewInvestment {
            organization_id: Some(org.id.clone()),
            amount_cents: 10_000,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    svc.db()
        .execute(
            "UPDATE investments SET organization_name = NULL WHERE organization_id = ?1",
            [org.id.as_str()],
        )
        .await
        .unwrap();
    svc.db()
        .execute("UPDATE organizations SET name = 'New Name Ltd' WHERE id = ?1", [org.id.as_str()])
        .await
        .unwrap();

    let resolved = svc.list_investments_resolved(10).await.unwrap();
    assert_eq!(resolved[0].organization_name.as_deref(), Some("New Name Ltd"));

    let totals = svc.investment_totals().await.unwrap();
    assert_eq!(totals[0].organization_name, "New Name Ltd");
}

#[tokio::test]
async fn activity_feed_is_newest_first() {
    let svc = test_service().await;
    let opp = svc
        .create_opportunity(
            Some("user_staff"),
            &NewOpportunity { title: "Residency".into(), ..Default::default() },
        )
        .await
        .unwrap();
    svc.set_opportunity_status(Some("user_staff"), &opp.id, OpportunityStatus::Closed)
        .await
        .unwrap();
    let sub = svc
        .create_submission(
            "user_a",
            &NewSubmission {
                kind: SubmissionKind::Organization,
                title: "Add our studio".into(),
                details: None,
                contact_email: None,
            },
        )
        .await
        .unwrap();
    svc.set_submission_status("user_staff", &sub.id, SubmissionStatus::Approved)
        .await
        .unwrap();

    let recent = svc.recent_audit(3).await.unwrap();
    let summary: Vec<(EntityType, AuditAction)> =
        recent.iter().map(|e| (e.entity_type, e.action)).collect();
    assert_eq!(
        summary,
        vec![
            (EntityType::Submission, AuditAction::StatusChanged),
            (EntityType::Submission, AuditAction::Created),
            (EntityType::Opportunity, AuditAction::StatusChanged),
        ]
    );
    assert_eq!(recent[0].actor_id.as_deref(), Some("user_staff"));
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eco.db");
    let path = path.to_str().unwrap();

    {
        let svc = EcoService::new_local(path, true).await.unwrap();
        svc.seed_demo(date(2026, 5, 1)).await.unwrap();
    }

    let svc = EcoService::new_local(path, true).await.unwrap();
    assert_eq!(svc.count_organizations().await.unwrap(), 3);
    assert!(svc.seed_demo(date(2026, 5, 1)).await.unwrap().is_none());
}

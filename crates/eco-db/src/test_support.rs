//! Shared test utilities for eco-db unit tests.

use eco_core::entities::{Opportunity, Organization};
use eco_core::enums::OpportunityStatus;

use crate::repos::opportunity::NewOpportunity;
use crate::repos::organization::NewOrganization;
use crate::service::EcoService;

/// In-memory service with the full schema.
pub async fn test_service() -> EcoService {
    EcoService::new_local(":memory:", true).await.unwrap()
}

pub async fn make_organization(svc: &EcoService, name: &str) -> Organization {
    svc.create_organization(
        None,
        &NewOrganization {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn make_opportunity(svc: &EcoService, title: &str) -> Opportunity {
    svc.create_opportunity(
        None,
        &NewOpportunity {
            title: title.to_string(),
            status: Some(OpportunityStatus::Open),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Ensure a member profile exists for `user_id` and return its ID.
pub async fn make_profile(svc: &EcoService, user_id: &str) -> String {
    svc.ensure_profile(user_id, None).await.unwrap().id
}

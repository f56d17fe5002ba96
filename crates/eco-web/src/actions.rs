//! Mutation actions behind the dashboard and site forms.
//!
//! Every action runs the same three steps:
//! 1. Reject a missing identity with `NotAuthenticated`, before touching the
//!    form or the database
//! 2. Validate the form values (`Validation`)
//! 3. Ensure the caller's profile exists, then do the single-table write
//!    (`NotFound` for a missing target row, `WriteFailed` otherwise)
//!
//! Actions return `Result<(), ActionError>`; the HTTP layer folds it into an
//! `ActionResult`.

use chrono::NaiveDate;
use serde::Deserialize;

use eco_core::action::ActionError;
use eco_core::enums::{
    DecisionStatus, EngagementKind, OpportunityStatus, SubmissionKind, SubmissionStatus,
};
use eco_core::identity::AuthIdentity;
use eco_db::error::DatabaseError;
use eco_db::repos::submission::NewSubmission;
use eco_db::service::EcoService;
use eco_db::updates::profile::ProfileUpdateBuilder;

/// Form body for expressing interest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterestForm {
    #[serde(default)]
    pub note: Option<String>,
}

/// Form body for every status-update action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

/// Profile form. An absent field is left alone; an empty one clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub practitioner_id: Option<String>,
}

/// Step 1 of every action.
///
/// # Errors
///
/// Returns `ActionError::NotAuthenticated` when `identity` is `None`.
pub const fn require_identity(
    identity: Option<&AuthIdentity>,
) -> Result<&AuthIdentity, ActionError> {
    match identity {
        Some(identity) => Ok(identity),
        None => Err(ActionError::NotAuthenticated),
    }
}

fn parse_status<T>(raw: &str) -> Result<T, ActionError>
where
    T: std::str::FromStr<Err = eco_core::errors::CoreError>,
{
    raw.trim().parse::<T>().map_err(ActionError::from)
}

fn required(value: &str, field: &str) -> Result<String, ActionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ActionError::Validation(format!("{field} is required.")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Map a repository error for a write against `entity` `id`.
fn write_error(entity: &str, id: &str, err: DatabaseError) -> ActionError {
    match err {
        DatabaseError::NoResult => ActionError::not_found(entity, id),
        DatabaseError::InvalidInput(msg) => ActionError::Validation(msg),
        other => {
            tracing::error!(entity, id, error = %other, "action write failed");
            ActionError::WriteFailed(other.to_string())
        }
    }
}

async fn ensure_caller_profile(
    svc: &EcoService,
    identity: &AuthIdentity,
) -> Result<(), ActionError> {
    svc.ensure_profile(&identity.user_id, identity.email.as_deref())
        .await
        .map(|_| ())
        .map_err(|e| write_error("Profile", &identity.user_id, e))
}

/// Record interest in an opportunity. Repeating it succeeds without a new row.
///
/// Drafts answer `NotFound`, the same as on the public site. Other statuses
/// that are not taking applicants answer `Validation`, unless the caller had
/// already expressed interest.
///
/// # Errors
///
/// See the module docs for the error order.
pub async fn express_interest(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    opportunity_id: &str,
    form: &InterestForm,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    let note = optional(form.note.as_deref());
    ensure_caller_profile(svc, identity).await?;

    let opportunity = svc
        .get_opportunity(opportunity_id)
        .await
        .map_err(|e| write_error("Opportunity", opportunity_id, e))?;
    if opportunity.status == OpportunityStatus::Draft {
        return Err(ActionError::not_found("Opportunity", opportunity_id));
    }
    if !opportunity.status.is_accepting() {
        let existing = svc
            .find_engagement(&identity.user_id, opportunity_id, EngagementKind::Interest)
            .await
            .map_err(|e| write_error("Opportunity", opportunity_id, e))?;
        if existing.is_some() {
            return Ok(());
        }
        return Err(ActionError::Validation(format!(
            "Opportunity is {} and not accepting interest.",
            opportunity.status
        )));
    }

    let (engagement, created) = svc
        .express_interest(&identity.user_id, opportunity_id, note.as_deref())
        .await
        .map_err(|e| write_error("Opportunity", opportunity_id, e))?;
    tracing::info!(
        user_id = %identity.user_id,
        opportunity_id,
        engagement_id = %engagement.id,
        created,
        "interest expressed"
    );
    Ok(())
}

/// # Errors
///
/// See the module docs for the error order.
pub async fn withdraw_interest(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    opportunity_id: &str,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    ensure_caller_profile(svc, identity).await?;

    svc.get_opportunity(opportunity_id)
        .await
        .map_err(|e| write_error("Opportunity", opportunity_id, e))?;
    svc.withdraw_interest(&identity.user_id, opportunity_id)
        .await
        .map_err(|e| write_error("Opportunity", opportunity_id, e))?;
    Ok(())
}

/// # Errors
///
/// Returns `ActionError::Validation` for a status outside [`OpportunityStatus::ALL`].
pub async fn update_opportunity_status(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    opportunity_id: &str,
    form: &StatusForm,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    let status: OpportunityStatus = parse_status(&form.status)?;
    ensure_caller_profile(svc, identity).await?;

    svc.set_opportunity_status(Some(&identity.user_id), opportunity_id, status)
        .await
        .map_err(|e| write_error("Opportunity", opportunity_id, e))?;
    Ok(())
}

/// # Errors
///
/// Returns `ActionError::Validation` for a status outside [`DecisionStatus::ALL`].
pub async fn update_decision_status(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    decision_id: &str,
    form: &StatusForm,
    today: NaiveDate,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    let status: DecisionStatus = parse_status(&form.status)?;
    ensure_caller_profile(svc, identity).await?;

    svc.set_decision_status(Some(&identity.user_id), decision_id, status, today)
        .await
        .map_err(|e| write_error("Decision", decision_id, e))?;
    Ok(())
}

/// # Errors
///
/// See the module docs for the error order.
pub async fn publish_narrative(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    narrative_id: &str,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    ensure_caller_profile(svc, identity).await?;

    svc.publish_narrative(Some(&identity.user_id), narrative_id)
        .await
        .map_err(|e| write_error("Narrative", narrative_id, e))?;
    Ok(())
}

/// # Errors
///
/// Returns `ActionError::Validation` for an unknown kind, a blank title, or a
/// contact email without `@`.
pub async fn create_submission(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    form: &SubmissionForm,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    let kind: SubmissionKind = parse_status(&form.kind)?;
    let title = required(&form.title, "Title")?;
    let contact_email = optional(form.contact_email.as_deref());
    if contact_email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(ActionError::Validation(
            "Contact email must be an email address.".into(),
        ));
    }
    ensure_caller_profile(svc, identity).await?;

    let submission = svc
        .create_submission(
            &identity.user_id,
            &NewSubmission {
                kind,
                title,
                details: optional(form.details.as_deref()),
                contact_email,
            },
        )
        .await
        .map_err(|e| write_error("Submission", "new", e))?;
    tracing::info!(submission_id = %submission.id, %kind, "submission received");
    Ok(())
}

/// # Errors
///
/// Returns `ActionError::Validation` for a status outside [`SubmissionStatus::ALL`].
pub async fn review_submission(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    submission_id: &str,
    form: &StatusForm,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    let status: SubmissionStatus = parse_status(&form.status)?;
    ensure_caller_profile(svc, identity).await?;

    svc.set_submission_status(&identity.user_id, submission_id, status)
        .await
        .map_err(|e| write_error("Submission", submission_id, e))?;
    Ok(())
}

/// # Errors
///
/// Returns `ActionError::Validation` when linking a practitioner that does
/// not exist.
pub async fn update_profile(
    svc: &EcoService,
    identity: Option<&AuthIdentity>,
    form: &ProfileForm,
) -> Result<(), ActionError> {
    let identity = require_identity(identity)?;
    let mut builder = ProfileUpdateBuilder::new();
    if let Some(display_name) = form.display_name.as_deref() {
        builder = builder.display_name(optional(Some(display_name)));
    }
    if let Some(practitioner_id) = form.practitioner_id.as_deref() {
        builder = builder.practitioner_id(optional(Some(practitioner_id)));
    }
    ensure_caller_profile(svc, identity).await?;

    svc.update_profile(&identity.user_id, builder.build())
        .await
        .map_err(|e| write_error("Profile", &identity.user_id, e))?;
    Ok(())
}

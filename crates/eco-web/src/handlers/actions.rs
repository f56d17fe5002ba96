//! HTTP wrappers around [`crate::actions`].
//!
//! Each handler resolves the caller's identity from the request headers and
//! answers with a JSON `ActionResult` and a matching status code. A body that
//! does not parse as a form is reported as a validation failure, but only
//! after the identity check.

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use eco_core::action::{ActionError, ActionResult};
use eco_core::identity::AuthIdentity;

use super::today;
use crate::actions::{self, InterestForm, ProfileForm, StatusForm, SubmissionForm};
use crate::state::AppState;

fn respond(result: Result<(), ActionError>) -> Response {
    let status = match &result {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };
    (status, Json(ActionResult::from(result))).into_response()
}

fn malformed(identity: Option<&AuthIdentity>, rejection: &FormRejection) -> Result<(), ActionError> {
    actions::require_identity(identity)?;
    Err(ActionError::Validation(rejection.body_text()))
}

pub async fn express_interest(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<InterestForm>, FormRejection>,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    let result = match form {
        Ok(Form(form)) => {
            actions::express_interest(&state.service, identity.as_ref(), &id, &form).await
        }
        Err(rejection) => malformed(identity.as_ref(), &rejection),
    };
    respond(result)
}

pub async fn withdraw_interest(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    respond(actions::withdraw_interest(&state.service, identity.as_ref(), &id).await)
}

pub async fn update_opportunity_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<StatusForm>, FormRejection>,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    let result = match form {
        Ok(Form(form)) => {
            actions::update_opportunity_status(&state.service, identity.as_ref(), &id, &form)
                .await
        }
        Err(rejection) => malformed(identity.as_ref(), &rejection),
    };
    respond(result)
}

pub async fn update_decision_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<StatusForm>, FormRejection>,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    let result = match form {
        Ok(Form(form)) => {
            actions::update_decision_status(
                &state.service,
                identity.as_ref(),
                &id,
                &form,
                today(),
            )
            .await
        }
        Err(rejection) => malformed(identity.as_ref(), &rejection),
    };
    respond(result)
}

pub async fn publish_narrative(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    respond(actions::publish_narrative(&state.service, identity.as_ref(), &id).await)
}

pub async fn create_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SubmissionForm>, FormRejection>,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    let result = match form {
        Ok(Form(form)) => {
            actions::create_submission(&state.service, identity.as_ref(), &form).await
        }
        Err(rejection) => malformed(identity.as_ref(), &rejection),
    };
    respond(result)
}

pub async fn review_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<StatusForm>, FormRejection>,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    let result = match form {
        Ok(Form(form)) => {
            actions::review_submission(&state.service, identity.as_ref(), &id, &form).await
        }
        Err(rejection) => malformed(identity.as_ref(), &rejection),
    };
    respond(result)
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<ProfileForm>, FormRejection>,
) -> Response {
    let identity = state.auth.identify(&headers).await;
    let result = match form {
        Ok(Form(form)) => actions::update_profile(&state.service, identity.as_ref(), &form).await,
        Err(rejection) => malformed(identity.as_ref(), &rejection),
    };
    respond(result)
}

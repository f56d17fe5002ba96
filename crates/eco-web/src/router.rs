use axum::Router;
use axum::middleware::map_response_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::error::apply_site_title;
use crate::handlers::{actions, dashboard, public};
use crate::state::AppState;

/// Every route the server answers, with request tracing and site-titled
/// error pages.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::home))
        .route("/healthz", get(public::healthz))
        .route("/opportunities", get(public::opportunities))
        .route("/opportunities/{id}", get(public::opportunity_detail))
        .route("/stories", get(public::stories))
        .route("/dashboard", get(dashboard::overview))
        .route("/dashboard/organizations", get(dashboard::organizations))
        .route("/dashboard/organizations/{id}", get(dashboard::organization_detail))
        .route("/dashboard/practitioners", get(dashboard::practitioners))
        .route("/dashboard/practitioners/{id}", get(dashboard::practitioner_detail))
        .route("/dashboard/opportunities", get(dashboard::opportunities))
        .route("/dashboard/investments", get(dashboard::investments))
        .route("/dashboard/decisions", get(dashboard::decisions))
        .route("/dashboard/narratives", get(dashboard::narratives))
        .route("/dashboard/outputs", get(dashboard::outputs))
        .route("/dashboard/submissions", get(dashboard::submissions))
        .route("/dashboard/profile", get(dashboard::profile))
        .route(
            "/actions/opportunities/{id}/interest",
            post(actions::express_interest),
        )
        .route(
            "/actions/opportunities/{id}/withdraw",
            post(actions::withdraw_interest),
        )
        .route(
            "/actions/opportunities/{id}/status",
            post(actions::update_opportunity_status),
        )
        .route(
            "/actions/decisions/{id}/status",
            post(actions::update_decision_status),
        )
        .route(
            "/actions/narratives/{id}/publish",
            post(actions::publish_narrative),
        )
        .route("/actions/submissions", post(actions::create_submission))
        .route(
            "/actions/submissions/{id}/status",
            post(actions::review_submission),
        )
        .route("/actions/profile", post(actions::update_profile))
        .layer(map_response_with_state(state.clone(), apply_site_title))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

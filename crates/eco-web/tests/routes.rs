//! Route-level behavior through the full router, driven with `oneshot`.
//!
//! - Public pages render without a session; dashboard pages need one
//! - Every action answers 401 without a session, even for a malformed body
//! - Expressing interest twice over HTTP leaves one engagement
//! - Status updates outside the allowed set answer 422

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use eco_auth::Authenticator;
use eco_config::SiteConfig;
use eco_core::entities::Opportunity;
use eco_core::enums::OpportunityStatus;
use eco_core::identity::AuthIdentity;
use eco_db::repos::opportunity::NewOpportunity;
use eco_db::service::EcoService;
use eco_web::{AppState, build_router};

const TOKEN: &str = "test-token";

async fn test_state() -> AppState {
    let service = EcoService::new_local(":memory:", true).await.unwrap();
    let auth = Authenticator::fixed([(TOKEN.to_string(), AuthIdentity::user("user_test"))]);
    AppState::new(service, auth, SiteConfig::default())
}

async fn seeded_opportunity(state: &AppState, status: OpportunityStatus) -> Opportunity {
    state
        .service
        .create_opportunity(
            None,
            &NewOpportunity {
                title: "Festival Touring Fund".into(),
                amount_cents: Some(500_000),
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn signed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str, signed: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if signed {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn action_json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn healthz_answers_ok() {
    let router = build_router(test_state().await);
    let (status, body) = send(&router, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn home_renders_on_empty_database() {
    let router = build_router(test_state().await);
    let (status, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn public_opportunity_pages() {
    let state = test_state().await;
    let open = seeded_opportunity(&state, OpportunityStatus::Open).await;
    let draft = seeded_opportunity(&state, OpportunityStatus::Draft).await;
    let router = build_router(state);

    let (status, body) = send(&router, get(&format!("/opportunities/{}", open.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Festival Touring Fund"));

    let (status, _) = send(&router, get(&format!("/opportunities/{}", draft.id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, get("/opportunities/opp-missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let router = build_router(test_state().await);

    let (status, _) = send(&router, get("/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&router, signed_get("/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn dashboard_rejects_unknown_submission_filter() {
    let router = build_router(test_state().await);
    let (status, _) = send(&router, signed_get("/dashboard/submissions?status=lost")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn actions_reject_missing_session_uniformly() {
    let state = test_state().await;
    let opp = seeded_opportunity(&state, OpportunityStatus::Open).await;
    let router = build_router(state.clone());

    let requests = [
        post_form(&format!("/actions/opportunities/{}/interest", opp.id), "", false),
        post_form(&format!("/actions/opportunities/{}/withdraw", opp.id), "", false),
        post_form(&format!("/actions/opportunities/{}/status", opp.id), "status=closed", false),
        post_form("/actions/decisions/dec-missing/status", "status=approved", false),
        post_form("/actions/narratives/nar-missing/publish", "", false),
        post_form("/actions/submissions", "kind=story&title=Hello", false),
        post_form("/actions/submissions/sub-missing/status", "status=approved", false),
        post_form("/actions/profile", "display_name=Someone", false),
    ];
    for request in requests {
        let uri = request.uri().to_string();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(action_json(&body)["success"], false, "{uri}");
    }

    let unchanged = state.service.get_opportunity(&opp.id).await.unwrap();
    assert_eq!(unchanged.status, OpportunityStatus::Open);
}

#[tokio::test]
async fn malformed_body_without_session_is_still_unauthenticated() {
    let state = test_state().await;
    let opp = seeded_opportunity(&state, OpportunityStatus::Open).await;
    let router = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/actions/opportunities/{}/status", opp.id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn interest_over_http_is_idempotent() {
    let state = test_state().await;
    let opp = seeded_opportunity(&state, OpportunityStatus::Open).await;
    let router = build_router(state.clone());
    let uri = format!("/actions/opportunities/{}/interest", opp.id);

    for _ in 0..2 {
        let (status, body) = send(&router, post_form(&uri, "note=Keen", true)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(action_json(&body)["success"], true);
    }

    let overview = state.service.get_opportunity_overview(&opp.id).await.unwrap();
    assert_eq!(overview.interest_count, 1);
}

#[tokio::test]
async fn status_outside_allowed_set_is_rejected() {
    let state = test_state().await;
    let opp = seeded_opportunity(&state, OpportunityStatus::Open).await;
    let router = build_router(state.clone());
    let uri = format!("/actions/opportunities/{}/status", opp.id);

    let (status, body) = send(&router, post_form(&uri, "status=archived", true)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json = action_json(&body);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());

    let (status, _) = send(&router, post_form(&uri, "status=closed", true)).await;
    assert_eq!(status, StatusCode::OK);
    let updated = state.service.get_opportunity(&opp.id).await.unwrap();
    assert_eq!(updated.status, OpportunityStatus::Closed);
}

#[tokio::test]
async fn action_on_missing_record_is_not_found() {
    let router = build_router(test_state().await);
    let (status, _) =
        send(&router, post_form("/actions/opportunities/opp-missing/interest", "", true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interest_follows_public_visibility() {
    let state = test_state().await;
    let draft = seeded_opportunity(&state, OpportunityStatus::Draft).await;
    let cancelled = seeded_opportunity(&state, OpportunityStatus::Cancelled).await;
    let router = build_router(state.clone());

    let draft_uri = format!("/actions/opportunities/{}/interest", draft.id);
    let (status, _) = send(&router, post_form(&draft_uri, "", true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let cancelled_uri = format!("/actions/opportunities/{}/interest", cancelled.id);
    let (status, body) = send(&router, post_form(&cancelled_uri, "", true)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(action_json(&body)["success"], false);

    for opp in [&draft, &cancelled] {
        let overview = state.service.get_opportunity_overview(&opp.id).await.unwrap();
        assert_eq!(overview.interest_count, 0);
    }
}

#[tokio::test]
async fn non_web_urls_are_not_linked() {
    let state = test_state().await;
    let opp = state
        .service
        .create_opportunity(
            None,
            &NewOpportunity {
                title: "Script Fund".into(),
                url: Some("javascript:alert(1)".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let router = build_router(state);

    let (status, body) = send(&router, get(&format!("/opportunities/{}", opp.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("javascript:"));
    assert!(!body.contains("Full details and application"));
}

#[tokio::test]
async fn error_pages_use_configured_site_title() {
    let service = EcoService::new_local(":memory:", true).await.unwrap();
    let site = SiteConfig {
        title: "Harbour Arts Map".into(),
        ..SiteConfig::default()
    };
    let router = build_router(AppState::new(service, Authenticator::fixed([]), site));

    let (status, body) = send(&router, get("/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Harbour Arts Map"));
    assert!(body.contains("Sign in required"));

    let (status, body) = send(&router, get("/opportunities/opp-missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Harbour Arts Map"));
}

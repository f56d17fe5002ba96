//! Page-level errors rendered as HTML.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use eco_config::SiteConfig;
use eco_db::error::DatabaseError;

use crate::components::{Area, empty_state, layout, link};
use crate::state::AppState;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Sign in required")]
    Unauthenticated,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl WebError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a failed lookup of `entity` to `NotFound`, anything else to `Database`.
    pub fn lookup(entity: &str) -> impl FnOnce(DatabaseError) -> Self + '_ {
        move |err| {
            if err.is_not_found() {
                Self::NotFound(entity.to_string())
            } else {
                Self::Database(err)
            }
        }
    }
}

/// Error page content, kept on the response so the site title can be applied
/// once the router state is in reach.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    title: String,
    body: String,
    area: Area,
}

impl ErrorPage {
    fn render(&self, site_title: &str) -> String {
        layout(site_title, &self.title, self.area, &self.body)
    }
}

impl WebError {
    fn page(&self) -> ErrorPage {
        let (title, body) = match self {
            Self::NotFound(entity) => (
                "Not found".to_string(),
                empty_state(&format!("{entity} not found.")),
            ),
            Self::Unauthenticated => (
                "Sign in required".to_string(),
                format!(
                    "{}<p>{}</p>",
                    empty_state("You need to sign in to view the dashboard."),
                    link("/", "Back to the public site")
                ),
            ),
            Self::BadRequest(reason) => ("Bad request".to_string(), empty_state(reason)),
            Self::Database(err) => {
                tracing::error!(error = %err, "page failed");
                (
                    "Something went wrong".to_string(),
                    empty_state("The page could not be loaded. Try again shortly."),
                )
            }
        };
        let area = if matches!(self, Self::Unauthenticated) {
            Area::Public
        } else {
            Area::Dashboard
        };
        ErrorPage { title, body, area }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let page = self.page();
        let mut response =
            (self.status(), Html(page.render(&SiteConfig::default().title))).into_response();
        response.extensions_mut().insert(page);
        response
    }
}

/// Re-render error pages with the configured site title.
pub async fn apply_site_title(State(state): State<AppState>, mut response: Response) -> Response {
    match response.extensions_mut().remove::<ErrorPage>() {
        Some(page) => (response.status(), Html(page.render(&state.site.title))).into_response(),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(WebError::NotFound("Opportunity".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(WebError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            WebError::Database(DatabaseError::Query("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn lookup_maps_missing_rows() {
        let err = WebError::lookup("Narrative")(DatabaseError::NoResult);
        assert!(matches!(err, WebError::NotFound(entity) if entity == "Narrative"));
        let err = WebError::lookup("Narrative")(DatabaseError::Query("boom".into()));
        assert!(matches!(err, WebError::Database(_)));
    }

    #[test]
    fn unauthenticated_page_is_401() {
        let response = WebError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

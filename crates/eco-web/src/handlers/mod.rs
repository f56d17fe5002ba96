//! axum handlers: public pages, dashboard pages, and form actions.

pub mod actions;
pub mod dashboard;
pub mod public;

use chrono::{NaiveDate, Utc};

/// The date pages and actions treat as "today".
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{SubmissionKind, SubmissionStatus};

/// A suggestion sent in through the site, waiting for staff review.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub kind: SubmissionKind,
    pub title: String,
    pub details: Option<String>,
    pub contact_email: Option<String>,
    pub status: SubmissionStatus,
    pub submitted_by: String,
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

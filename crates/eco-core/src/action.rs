//! Result envelope returned by mutation actions to the calling form.
//!
//! Actions never propagate errors to the caller. Every failure is folded into
//! an `ActionResult { success: false, error }` whose message comes from one
//! of the four `ActionError` kinds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::CoreError;

/// Why an action did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("You must be signed in to do that.")]
    NotAuthenticated,

    #[error("{entity} '{id}' was not found.")]
    NotFound { entity: String, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Could not save changes: {0}")]
    WriteFailed(String),
}

impl ActionError {
    /// HTTP status code the web layer answers with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotAuthenticated => 401,
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 422,
            Self::WriteFailed(_) => 500,
        }
    }

    #[must_use]
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<CoreError> for ActionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Other(e) => Self::WriteFailed(e.to_string()),
        }
    }
}

/// `{ success, error }` as seen by forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionResult {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(err: &ActionError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
        }
    }
}

impl From<Result<(), ActionError>> for ActionResult {
    fn from(result: Result<(), ActionError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self::failed(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok_serializes_with_null_error() {
        let json = serde_json::to_value(ActionResult::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "error": null }));
    }

    #[test]
    fn failure_carries_message() {
        let result = ActionResult::failed(&ActionError::not_found("Opportunity", "opp-1"));
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Opportunity 'opp-1' was not found.")
        );
    }

    #[test]
    fn status_codes_per_kind() {
        assert_eq!(ActionError::NotAuthenticated.status_code(), 401);
        assert_eq!(ActionError::not_found("Decision", "x").status_code(), 404);
        assert_eq!(ActionError::Validation("bad".into()).status_code(), 422);
        assert_eq!(ActionError::WriteFailed("io".into()).status_code(), 500);
    }

    #[test]
    fn core_validation_maps_to_validation() {
        let err: ActionError = CoreError::Validation("invalid status".into()).into();
        assert_eq!(err, ActionError::Validation("invalid status".into()));
    }
}

//! Cross-cutting error types for Ecosphere.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, ...) live in their own
//! crates. `eco-web` is where they converge.

use thiserror::Error;

/// Errors that can be raised by any Ecosphere crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (unknown enum value, empty required field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

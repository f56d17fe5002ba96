use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no session token in request")]
    MissingToken,

    #[error("authentication is not configured (set ECOSPHERE_CLERK__SECRET_KEY)")]
    NotConfigured,

    #[error("session token expired")]
    TokenExpired,

    #[error("JWKS validation failed: {0}")]
    JwksValidation(String),
}

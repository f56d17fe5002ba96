//! Clerk authentication configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Clerk publishable key, rendered into pages for the sign-in widget.
    #[serde(default)]
    pub publishable_key: String,

    /// Clerk secret key. Needed to fetch JWKS and validate session tokens.
    #[serde(default)]
    pub secret_key: String,

    /// Hosted sign-in page linked from the "Sign in required" page.
    #[serde(default)]
    pub sign_in_url: String,
}

impl ClerkConfig {
    /// Session tokens can only be validated with a secret key.
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!ClerkConfig::default().is_configured());
    }

    #[test]
    fn configured_with_secret_key() {
        let config = ClerkConfig {
            secret_key: "sk_test_456".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}

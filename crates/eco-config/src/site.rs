//! Site presentation settings.

use serde::{Deserialize, Serialize};

fn default_title() -> String {
    "Creative Economy Atlas".to_string()
}

const fn default_limit() -> u32 {
    50
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Title shown in the page header and `<title>`.
    #[serde(default = "default_title")]
    pub title: String,

    /// Region the ecosystem covers, shown under the title.
    #[serde(default)]
    pub region: String,

    /// Row limit for list pages.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Currency used for totals that mix rows.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            region: String::new(),
            default_limit: default_limit(),
            currency: default_currency(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Creative Economy Atlas");
        assert!(config.region.is_empty());
        assert_eq!(config.default_limit, 50);
        assert_eq!(config.currency, "USD");
    }
}

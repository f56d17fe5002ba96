//! # eco-config
//!
//! Layered configuration loading for Ecosphere using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ECOSPHERE_*` prefix, `__` as separator)
//! 2. Project-level `./ecosphere.toml`
//! 3. User-level `~/.config/ecosphere/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `ECOSPHERE_DATABASE__URL` -> `database.url`, `ECOSPHERE_CLERK__SECRET_KEY` ->
//! `clerk.secret_key`, `ECOSPHERE_SERVER__PORT` -> `server.port`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use eco_config::EcoConfig;
//!
//! let config = EcoConfig::load_with_dotenv().expect("config");
//! if config.database.is_remote() {
//!     println!("database host: {:?}", config.database.host());
//! }
//! ```

mod clerk;
mod database;
mod error;
mod server;
mod site;

pub use clerk::ClerkConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use server::ServerConfig;
pub use site::SiteConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ecosphere.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EcoConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

impl EcoConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT read `.env`; use [`EcoConfig::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("ECOSPHERE_").split("__"))
    }

    /// Names of the sections that have enough values to talk to their service.
    pub fn configured_sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if self.database.is_remote() {
            sections.push("database");
        }
        if self.clerk.is_configured() {
            sections.push("clerk");
        }
        sections
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.site.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "site.default_limit".into(),
                reason: "must be greater than zero".into(),
            });
        }
        let currency = self.site.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue {
                field: "site.currency".into(),
                reason: format!("'{currency}' is not a three-letter currency code"),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ecosphere").join("config.toml"))
    }
}

//! Startup wiring: config sections to database handle and authenticator.

use anyhow::Context;

use eco_auth::Authenticator;
use eco_config::{DatabaseConfig, EcoConfig};
use eco_db::service::EcoService;

use crate::state::AppState;

/// Open the hosted database when `database.url` and `database.auth_token`
/// are both set, otherwise the local file at `database.local_path`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn open_service(database: &DatabaseConfig, run_migrations: bool) -> anyhow::Result<EcoService> {
    if database.is_remote() {
        let host = database.host().unwrap_or_default();
        tracing::info!(host, "opening hosted database");
        return EcoService::new_remote(&database.url, &database.auth_token, run_migrations)
            .await
            .with_context(|| format!("failed to open hosted database at {host}"));
    }

    if database.url.is_empty() != database.auth_token.is_empty() {
        tracing::warn!(
            "database.url and database.auth_token must both be set to use the hosted database; \
             falling back to the local file"
        );
    }
    tracing::info!(path = %database.local_path, "opening local database");
    EcoService::new_local(&database.local_path, run_migrations)
        .await
        .with_context(|| format!("failed to open local database at {}", database.local_path))
}

/// Build the authenticator from the `clerk` section.
#[must_use]
pub fn authenticator(config: &EcoConfig) -> Authenticator {
    let auth = Authenticator::new(Some(config.clerk.secret_key.as_str()));
    if !auth.is_enabled() {
        tracing::warn!("clerk.secret_key is not set; every request is anonymous and actions will be refused");
    }
    auth
}

/// Everything the server needs, from a loaded config.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn build_state(config: &EcoConfig) -> anyhow::Result<AppState> {
    let service = open_service(&config.database, config.database.run_migrations).await?;
    Ok(AppState::new(service, authenticator(config), config.site.clone()))
}

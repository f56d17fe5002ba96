use std::sync::Arc;

use eco_auth::Authenticator;
use eco_config::SiteConfig;
use eco_db::service::EcoService;

/// Shared request state. Cloned per request; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EcoService>,
    pub auth: Arc<Authenticator>,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(service: EcoService, auth: Authenticator, site: SiteConfig) -> Self {
        Self {
            service: Arc::new(service),
            auth: Arc::new(auth),
            site: Arc::new(site),
        }
    }
}

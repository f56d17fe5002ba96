//! Hosted database (libSQL / Turso) configuration.

use serde::{Deserialize, Serialize};

fn default_local_path() -> String {
    "ecosphere.db".to_string()
}

const fn default_run_migrations() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Remote database URL (e.g., `libsql://ecosphere-myorg.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Role-scoped database auth token.
    #[serde(default)]
    pub auth_token: String,

    /// Local database file used when no remote is configured. `:memory:` works too.
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Apply embedded migrations when the database is opened.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: String::new(),
            local_path: default_local_path(),
            run_migrations: default_run_migrations(),
        }
    }
}

impl DatabaseConfig {
    /// Whether both the remote URL and its auth token are set.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Hostname portion of the remote URL, for logging without credentials.
    ///
    /// Accepts `libsql://`, `https://` and `http://` schemes.
    pub fn host(&self) -> Option<&str> {
        let rest = ["libsql://", "https://", "http://"]
            .iter()
            .find_map(|scheme| self.url.strip_prefix(scheme))?;
        let host = rest.split(['/', '?']).next()?;
        if host.is_empty() { None } else { Some(host) }
    }
}

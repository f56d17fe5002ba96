//! Service layer wrapping the database handle.
//!
//! `EcoService` is what the web layer holds. Repository methods are added to it
//! in `repos/*` through `impl EcoService` blocks. Every mutation follows the
//! same protocol:
//! 1. Execute the single-table write
//! 2. Append an audit entry naming the actor

use crate::EcoDb;
use crate::error::DatabaseError;

pub struct EcoService {
    db: EcoDb,
}

impl EcoService {
    /// Create a service backed by a local database (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, run_migrations: bool) -> Result<Self, DatabaseError> {
        let db = EcoDb::open_local(db_path, run_migrations).await?;
        Ok(Self { db })
    }

    /// Create a service backed by the hosted database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the remote connection fails.
    pub async fn new_remote(
        url: &str,
        auth_token: &str,
        run_migrations: bool,
    ) -> Result<Self, DatabaseError> {
        let db = EcoDb::open_remote(url, auth_token, run_migrations).await?;
        Ok(Self { db })
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &EcoDb {
        &self.db
    }
}

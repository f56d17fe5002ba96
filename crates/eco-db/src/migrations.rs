//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time. Every statement uses
//! `IF NOT EXISTS`, so running them on each open is safe.

use crate::EcoDb;
use crate::error::DatabaseError;

/// Initial schema: 11 tables, 11 indexes, 2 views.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl EcoDb {
    /// Run all embedded migrations in sequence.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Migration` naming the failing migration.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        tracing::debug!("migrations applied");
        Ok(())
    }
}

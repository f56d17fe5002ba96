//! # eco-db
//!
//! libSQL database operations for Ecosphere.
//!
//! Holds every relational row the dashboard and public site read: organizations,
//! practitioners, opportunities, investments, decisions, narratives, outputs,
//! engagements, profiles, submissions, and the audit trail.
//!
//! Production talks to a hosted libSQL database (Turso) over HTTP with a
//! role-scoped auth token. Development and tests use a local file or
//! `:memory:` with the same schema.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod seed;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::params::IntoParams;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and one connection. Repositories reach it through
/// `EcoService::db`.
pub struct EcoDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
}

impl EcoDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str, run_migrations: bool) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let eco_db = Self {
            db,
            conn,
            remote: false,
        };
        if run_migrations {
            eco_db.run_migrations().await?;
        }
        tracing::info!(path, "opened local database");
        Ok(eco_db)
    }

    /// Open the hosted database over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(
        url: &str,
        auth_token: &str,
        run_migrations: bool,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;

        let eco_db = Self {
            db,
            conn,
            remote: true,
        };
        if run_migrations {
            eco_db.run_migrations().await?;
        }
        tracing::info!("opened remote database");
        Ok(eco_db)
    }

    /// Whether this handle talks to the hosted database.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Execute a statement and return the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the statement fails.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        tracing::trace!(sql, "execute");
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Run a query and return its rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the query fails.
    pub async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        tracing::trace!(sql, "query");
        Ok(self.conn.query(sql, params).await?)
    }

    /// Run a single-column integer query such as `SELECT COUNT(*) ...`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the query returns no row.
    pub async fn query_scalar(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self.query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"org-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

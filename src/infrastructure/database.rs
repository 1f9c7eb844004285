//! Pooled SQLite connection

use log::{error, info};
use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::ops::Deref;
use std::str::FromStr;
use thiserror::Error;

/// Failure indicator returned by every repository operation.
///
/// The underlying driver error is logged where it happens and never leaves the
/// persistence layer; callers only learn which operation failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("failed to {operation}")]
pub struct StoreError {
    pub operation: &'static str,
}

impl StoreError {
    /// Logs `err` and turns it into a `StoreError` for `operation`.
    pub fn trap(operation: &'static str, err: sqlx::Error) -> Self {
        error!("failed to {operation}: {err}");
        StoreError { operation }
    }
}

/// Handle to the embedded store, shared by every repository.
pub struct DatabaseConnection {
    connection: SqlitePool,
}

impl DatabaseConnection {
    /// Opens (creating if needed) the database at `database_url`.
    pub async fn open(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("connected to {database_url}");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        DatabaseConnection { connection: pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!().run(&self.connection).await
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

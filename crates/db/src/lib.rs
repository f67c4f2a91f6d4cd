//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definition for `uploaded_files`
//! - The file record repository used by reconciliation runs
//! - Database migrations
//! - Connection helpers

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{FileRecordRepository, FileRecordRow, map_db_err};

use std::future::Future;

use lumora_core::reconciliation::ReconciliationError;
use lumora_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{debug, warn};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Runs `f` with a fresh connection and closes it afterwards.
///
/// The connection is closed exactly once whether `f` succeeds or fails.
///
/// # Errors
///
/// Returns [`ReconciliationError::Connection`] if connecting fails, otherwise
/// whatever `f` returns.
pub async fn with_connection<F, Fut, T>(
    config: &DatabaseConfig,
    f: F,
) -> Result<T, ReconciliationError>
where
    F: FnOnce(DatabaseConnection) -> Fut,
    Fut: Future<Output = Result<T, ReconciliationError>>,
{
    let db = connect_with(config).await.map_err(map_db_err)?;
    debug!("Database connection acquired");

    let outcome = f(db.clone()).await;

    if let Err(err) = db.close().await {
        warn!(error = %err, "Failed to close database connection");
    } else {
        debug!("Database connection released");
    }

    outcome
}

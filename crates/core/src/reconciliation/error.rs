//! Reconciliation error types.

use lumora_shared::AppError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that end or degrade a reconciliation run.
#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    /// The relational store is unreachable.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// The file record query failed.
    #[error("file record query failed: {0}")]
    Query(String),

    /// The object store is absent or could not be listed.
    #[error("object store listing unavailable: {0}")]
    ListingUnavailable(String),

    /// Snapshots were not fetched before the deadline.
    #[error("snapshot fetch timed out after {secs}s")]
    Timeout {
        /// Configured deadline in seconds.
        secs: u64,
    },
}

impl ReconciliationError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a listing unavailable error.
    #[must_use]
    pub fn listing_unavailable(msg: impl Into<String>) -> Self {
        Self::ListingUnavailable(msg.into())
    }

    /// Whether the failure is isolated to the object store side.
    #[must_use]
    pub fn is_store_side(&self) -> bool {
        matches!(self, Self::ListingUnavailable(_))
    }

    /// Machine-readable code for result payloads.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "DATABASE_CONNECTION_ERROR",
            Self::Query(_) => "DATABASE_QUERY_ERROR",
            Self::ListingUnavailable(_) => "LISTING_UNAVAILABLE",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }
}

impl From<StorageError> for ReconciliationError {
    fn from(err: StorageError) -> Self {
        Self::ListingUnavailable(err.to_string())
    }
}

impl From<ReconciliationError> for AppError {
    fn from(err: ReconciliationError) -> Self {
        let message = err.to_string();
        match err {
            ReconciliationError::Connection(_) | ReconciliationError::Query(_) => {
                Self::Database(message)
            }
            ReconciliationError::ListingUnavailable(_) => Self::ServiceUnavailable(message),
            ReconciliationError::Timeout { .. } => Self::Timeout(message),
        }
    }
}

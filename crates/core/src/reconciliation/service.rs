//! Reconciliation run orchestration.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lumora_shared::AuditConfig;
use tracing::{info, warn};

use super::engine::ReconciliationEngine;
use super::error::ReconciliationError;
use super::types::{DatabaseAggregate, FileRecord, ReconciliationResult, RemoteObject};
use crate::storage::{ObjectListing, list_all_objects};

/// Read-only access to the file records held by the relational store.
pub trait FileRecordSource: Send + Sync {
    /// Fetch every file record, newest upload first.
    fn fetch_file_records(
        &self,
    ) -> impl Future<Output = Result<Vec<FileRecord>, ReconciliationError>> + Send;
}

/// How a run ended when the database side succeeded.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Both snapshots were available.
    Complete(ReconciliationResult),
    /// The store could not be listed; only database totals are known.
    StoreUnavailable {
        /// Database snapshot totals.
        database: DatabaseAggregate,
        /// Why the store was unavailable.
        reason: ReconciliationError,
    },
}

/// Fetches both snapshots concurrently and reconciles them.
pub struct ReconciliationService<S, L> {
    records: Arc<S>,
    listing: Option<Arc<L>>,
    engine: ReconciliationEngine,
    prefix: Option<String>,
    timeout: Duration,
}

impl<S, L> ReconciliationService<S, L>
where
    S: FileRecordSource,
    L: ObjectListing,
{
    /// Default deadline for the fetch phase.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a service. A `None` listing means no store is configured.
    #[must_use]
    pub fn new(records: Arc<S>, listing: Option<Arc<L>>, engine: ReconciliationEngine) -> Self {
        Self {
            records,
            listing,
            engine,
            prefix: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Create a service using audit settings for sampling, rules, prefix and deadline.
    #[must_use]
    pub fn from_audit_config(
        records: Arc<S>,
        listing: Option<Arc<L>>,
        audit: &AuditConfig,
    ) -> Self {
        let engine = ReconciliationEngine::from_rules(audit.rules.clone(), audit.sample_size);
        Self::new(records, listing, engine)
            .with_prefix(audit.prefix.clone())
            .with_timeout(Duration::from_secs(audit.timeout_secs))
    }

    /// Only audit objects under `prefix`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        let prefix = prefix.filter(|p| !p.is_empty());
        self.engine = self.engine.with_scope_prefix(prefix.clone());
        self.prefix = prefix;
        self
    }

    /// Set the fetch-phase deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one reconciliation.
    ///
    /// Both snapshots are fetched concurrently, each under the deadline.
    /// Store-side failures, including a listing that outlives the deadline,
    /// are reported as [`RunOutcome::StoreUnavailable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read before the deadline.
    pub async fn run(&self) -> Result<RunOutcome, ReconciliationError> {
        let started = Instant::now();

        let secs = self.timeout.as_secs();
        let (records, objects) = tokio::join!(
            tokio::time::timeout(self.timeout, self.records.fetch_file_records()),
            tokio::time::timeout(self.timeout, self.fetch_objects()),
        );

        let records = records.map_err(|_| ReconciliationError::Timeout { secs })??;
        let objects = objects.unwrap_or_else(|_| {
            Err(ReconciliationError::listing_unavailable(format!(
                "listing timed out after {secs}s"
            )))
        });

        match objects {
            Ok(objects) => {
                let result = self.engine.reconcile(&records, &objects);
                info!(
                    records = result.database.record_count,
                    objects = result.store.object_count,
                    orphaned = result.orphaned.count,
                    missing = result.missing.count,
                    discrepancy_bytes = result.discrepancy_bytes,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Reconciliation complete"
                );
                Ok(RunOutcome::Complete(result))
            }
            Err(reason) => {
                warn!(
                    error = %reason,
                    records = records.len(),
                    "Object store unavailable, reporting database totals only"
                );
                Ok(RunOutcome::StoreUnavailable {
                    database: ReconciliationEngine::aggregate_database(&records),
                    reason,
                })
            }
        }
    }

    async fn fetch_objects(&self) -> Result<Vec<RemoteObject>, ReconciliationError> {
        let Some(listing) = &self.listing else {
            return Err(ReconciliationError::listing_unavailable(
                "object storage is not configured",
            ));
        };

        Ok(list_all_objects(listing.as_ref(), self.prefix.as_deref()).await?)
    }
}

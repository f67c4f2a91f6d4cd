//! Storage reconciliation.
//!
//! Audits the relational record of uploaded files against the objects that
//! actually exist in the remote store:
//! - Database and store aggregates
//! - Orphan detection (objects with no record)
//! - Heuristic orphan classification
//! - Missing-object detection (records with no object)
//! - Size discrepancy between the two sources
//!
//! The engine is read-only and advisory; it never deletes or modifies objects.

pub mod classifier;
pub mod engine;
pub mod error;
pub mod record;
pub mod service;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use classifier::Classifier;
pub use engine::ReconciliationEngine;
pub use error::ReconciliationError;
pub use record::{SizeField, parse_size_bytes, parse_size_mb};
pub use service::{FileRecordSource, ReconciliationService, RunOutcome};
pub use types::{
    CategoryTotals, DatabaseAggregate, FileRecord, MissingAggregate, OrphanAggregate,
    OrphanedObject, ReconciliationResult, StoreAggregate,
};

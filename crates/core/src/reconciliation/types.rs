//! Reconciliation data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lumora_shared::types::OrphanCategory;
use rust_decimal::Decimal;
use serde::Serialize;

pub use crate::storage::RemoteObject;

/// A file record from the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Owning user.
    pub owner_id: String,
    /// Photo session the upload belongs to.
    pub session_id: Option<String>,
    /// Original filename.
    pub filename: String,
    /// Storage key, when the upload reached the store.
    pub storage_key: Option<String>,
    /// Size in bytes (0 when missing or malformed).
    pub size_bytes: u64,
    /// Size in megabytes as recorded by the database (0 when missing or malformed).
    pub size_mb: Decimal,
    /// Folder classification tag.
    pub folder: Option<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
    /// Whether either size column held a non-numeric or negative value.
    pub has_malformed_size: bool,
}

/// Totals over the database snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseAggregate {
    /// Number of file records.
    pub record_count: usize,
    /// Sum of byte sizes.
    pub total_size_bytes: u64,
    /// Sum of the native megabyte column.
    pub total_size_mb: Decimal,
    /// Records with no storage key.
    pub records_without_key: usize,
    /// Keyed records that share a key with an earlier record.
    pub duplicate_key_count: usize,
    /// Records whose size columns could not be parsed.
    pub malformed_record_count: usize,
}

/// Totals over the store snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreAggregate {
    /// Number of objects.
    pub object_count: usize,
    /// Sum of object sizes in bytes.
    pub total_size_bytes: u64,
}

/// Count and size of one orphan category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    /// Number of orphaned objects.
    pub count: usize,
    /// Total size in bytes.
    pub total_size_bytes: u64,
}

/// An orphaned object with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanedObject {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size_bytes: u64,
    /// Heuristic category.
    pub category: OrphanCategory,
}

/// Objects in the store with no database record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanAggregate {
    /// Number of orphaned objects.
    pub count: usize,
    /// Total orphaned size in bytes.
    pub total_size_bytes: u64,
    /// Every orphan, sorted by key.
    pub objects: Vec<OrphanedObject>,
    /// Per-category totals; every category is present.
    pub categories: BTreeMap<OrphanCategory, CategoryTotals>,
    /// First orphaned keys in key order.
    pub sample_keys: Vec<String>,
}

/// Database records whose storage key is absent from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingAggregate {
    /// Number of records.
    pub count: usize,
    /// Recorded size of those records in bytes.
    pub total_size_bytes: u64,
    /// First missing keys in key order, without duplicates.
    pub sample_keys: Vec<String>,
}

/// Output of one reconciliation run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    /// Database snapshot totals.
    pub database: DatabaseAggregate,
    /// Store snapshot totals.
    pub store: StoreAggregate,
    /// Orphaned objects.
    pub orphaned: OrphanAggregate,
    /// Records without a backing object.
    pub missing: MissingAggregate,
    /// Store total minus database total, in bytes.
    pub discrepancy_bytes: i64,
    /// Key prefix the store listing was limited to. Database totals are
    /// never scoped, so a prefixed discrepancy compares unlike totals.
    pub scope_prefix: Option<String>,
}

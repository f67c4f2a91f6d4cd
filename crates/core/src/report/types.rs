//! Report payload types.

use std::collections::BTreeMap;

use lumora_shared::types::OrphanCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A size shown in bytes and binary MB/GB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeFigure {
    /// Exact size in bytes.
    pub bytes: u64,
    /// Megabytes, rounded for display.
    pub megabytes: Decimal,
    /// Gigabytes, rounded for display.
    pub gigabytes: Decimal,
}

/// A signed size difference shown in bytes and binary MB/GB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyFigure {
    /// Store total minus database total, in bytes.
    pub bytes: i64,
    /// Megabytes, rounded for display.
    pub megabytes: Decimal,
    /// Gigabytes, rounded for display.
    pub gigabytes: Decimal,
}

/// Database side of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Number of file records.
    pub total_records: usize,
    /// Sum of the byte column.
    pub total_size: SizeFigure,
    /// Sum of the native megabyte column, unrounded.
    pub recorded_megabytes: Decimal,
    /// Records with no storage key.
    pub records_without_key: usize,
    /// Keyed records sharing a key with another record.
    pub duplicate_key_count: usize,
    /// Records with unparseable size columns.
    pub malformed_record_count: usize,
}

/// Store side of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Number of listed objects.
    pub total_objects: usize,
    /// Sum of object sizes.
    pub total_size: SizeFigure,
}

/// Totals for one orphan category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySection {
    /// Number of orphans.
    pub count: usize,
    /// Their total size.
    pub total_size: SizeFigure,
}

/// Orphaned objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanSection {
    /// Number of orphans.
    pub count: usize,
    /// Their total size.
    pub total_size: SizeFigure,
    /// Breakdown by category.
    pub categories: BTreeMap<OrphanCategory, CategorySection>,
    /// First orphaned keys in key order.
    pub sample_keys: Vec<String>,
}

/// Records whose object is absent from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSection {
    /// Number of records.
    pub count: usize,
    /// Their recorded size.
    pub total_size: SizeFigure,
    /// First missing keys in key order.
    pub sample_keys: Vec<String>,
}

/// Failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFailure {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Structured result of one reconciliation run.
///
/// On failure only `success`, `error` and, when the failure was isolated to
/// the store, `database` are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Whether both snapshots were reconciled.
    pub success: bool,
    /// Database totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseSection>,
    /// Store totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreSection>,
    /// Orphaned objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphaned: Option<OrphanSection>,
    /// Records without objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingSection>,
    /// Store minus database size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrepancy: Option<DiscrepancyFigure>,
    /// Prefix the store side was limited to; database totals stay unscoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_prefix: Option<String>,
    /// Failure details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportFailure>,
}

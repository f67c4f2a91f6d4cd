//! Renders run outcomes into report payloads.
//!
//! Rounding happens here and only here; the underlying result keeps exact
//! byte counts.

use std::collections::BTreeMap;

use lumora_shared::types::{
    bytes_to_gigabytes, bytes_to_megabytes, signed_bytes_to_gigabytes, signed_bytes_to_megabytes,
};
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{
    CategorySection, DatabaseSection, DiscrepancyFigure, MissingSection, OrphanSection,
    ReconciliationReport, ReportFailure, SizeFigure, StoreSection,
};
use crate::reconciliation::{
    DatabaseAggregate, MissingAggregate, OrphanAggregate, ReconciliationError,
    ReconciliationResult, RunOutcome, StoreAggregate,
};

/// Decimal places shown for MB/GB values.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Stateless report renderer.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Render any run outcome.
    #[must_use]
    pub fn render(outcome: &Result<RunOutcome, ReconciliationError>) -> ReconciliationReport {
        match outcome {
            Ok(RunOutcome::Complete(result)) => Self::complete(result),
            Ok(RunOutcome::StoreUnavailable { database, reason }) => {
                Self::store_unavailable(database, reason)
            }
            Err(err) => Self::failure(err),
        }
    }

    /// Render a full result.
    #[must_use]
    pub fn complete(result: &ReconciliationResult) -> ReconciliationReport {
        ReconciliationReport {
            success: true,
            database: Some(database_section(&result.database)),
            store: Some(store_section(&result.store)),
            orphaned: Some(orphan_section(&result.orphaned)),
            missing: Some(missing_section(&result.missing)),
            discrepancy: Some(discrepancy_figure(result.discrepancy_bytes)),
            scope_prefix: result.scope_prefix.clone(),
            error: None,
        }
    }

    /// Render a run whose store side failed. Database totals are kept.
    #[must_use]
    pub fn store_unavailable(
        database: &DatabaseAggregate,
        reason: &ReconciliationError,
    ) -> ReconciliationReport {
        ReconciliationReport {
            database: Some(database_section(database)),
            ..Self::failure(reason)
        }
    }

    /// Render a failed run.
    #[must_use]
    pub fn failure(error: &ReconciliationError) -> ReconciliationReport {
        ReconciliationReport {
            success: false,
            database: None,
            store: None,
            orphaned: None,
            missing: None,
            discrepancy: None,
            scope_prefix: None,
            error: Some(ReportFailure {
                code: error.error_code().to_string(),
                message: error.to_string(),
            }),
        }
    }

    /// Multi-line human-readable summary.
    #[must_use]
    pub fn summary_text(report: &ReconciliationReport) -> String {
        let mut lines = vec![format!(
            "Storage reconciliation: {}",
            if report.success { "OK" } else { "FAILED" }
        )];

        if let Some(prefix) = &report.scope_prefix {
            lines.push(format!(
                "Scope: objects under '{prefix}' (database totals cover all records)"
            ));
        }

        if let Some(db) = &report.database {
            lines.push(format!(
                "Database: {} records, {}",
                db.total_records,
                size_text(&db.total_size)
            ));
            lines.push(format!(
                "  without key: {}, duplicate keys: {}, malformed sizes: {}",
                db.records_without_key, db.duplicate_key_count, db.malformed_record_count
            ));
        }

        if let Some(store) = &report.store {
            lines.push(format!(
                "Store: {} objects, {}",
                store.total_objects,
                size_text(&store.total_size)
            ));
        }

        if let Some(orphaned) = &report.orphaned {
            lines.push(format!(
                "Orphaned: {} objects, {}",
                orphaned.count,
                size_text(&orphaned.total_size)
            ));
            for (category, totals) in &orphaned.categories {
                lines.push(format!(
                    "  {:<15} {:>8}  {:>10.2} MB",
                    category.as_str(),
                    totals.count,
                    totals.total_size.megabytes
                ));
            }
            for key in &orphaned.sample_keys {
                lines.push(format!("  - {key}"));
            }
        }

        if let Some(missing) = &report.missing {
            lines.push(format!(
                "Missing: {} records, {}",
                missing.count,
                size_text(&missing.total_size)
            ));
            for key in &missing.sample_keys {
                lines.push(format!("  - {key}"));
            }
        }

        if let Some(discrepancy) = &report.discrepancy {
            lines.push(format!(
                "Discrepancy: {} bytes ({:.2} MB, {:.2} GB)",
                discrepancy.bytes, discrepancy.megabytes, discrepancy.gigabytes
            ));
        }

        if let Some(error) = &report.error {
            lines.push(format!("Error [{}]: {}", error.code, error.message));
        }

        lines.join("\n")
    }
}

fn round_for_display(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_DECIMAL_PLACES);
    rounded
}

fn size_figure(bytes: u64) -> SizeFigure {
    SizeFigure {
        bytes,
        megabytes: round_for_display(bytes_to_megabytes(bytes)),
        gigabytes: round_for_display(bytes_to_gigabytes(bytes)),
    }
}

fn discrepancy_figure(bytes: i64) -> DiscrepancyFigure {
    DiscrepancyFigure {
        bytes,
        megabytes: round_for_display(signed_bytes_to_megabytes(bytes)),
        gigabytes: round_for_display(signed_bytes_to_gigabytes(bytes)),
    }
}

fn size_text(size: &SizeFigure) -> String {
    format!("{:.2} MB ({:.2} GB)", size.megabytes, size.gigabytes)
}

fn database_section(db: &DatabaseAggregate) -> DatabaseSection {
    DatabaseSection {
        total_records: db.record_count,
        total_size: size_figure(db.total_size_bytes),
        recorded_megabytes: db.total_size_mb,
        records_without_key: db.records_without_key,
        duplicate_key_count: db.duplicate_key_count,
        malformed_record_count: db.malformed_record_count,
    }
}

fn store_section(store: &StoreAggregate) -> StoreSection {
    StoreSection {
        total_objects: store.object_count,
        total_size: size_figure(store.total_size_bytes),
    }
}

fn orphan_section(orphaned: &OrphanAggregate) -> OrphanSection {
    let categories: BTreeMap<_, _> = orphaned
        .categories
        .iter()
        .map(|(category, totals)| {
            (
                *category,
                CategorySection {
                    count: totals.count,
                    total_size: size_figure(totals.total_size_bytes),
                },
            )
        })
        .collect();

    OrphanSection {
        count: orphaned.count,
        total_size: size_figure(orphaned.total_size_bytes),
        categories,
        sample_keys: orphaned.sample_keys.clone(),
    }
}

fn missing_section(missing: &MissingAggregate) -> MissingSection {
    MissingSection {
        count: missing.count,
        total_size: size_figure(missing.total_size_bytes),
        sample_keys: missing.sample_keys.clone(),
    }
}

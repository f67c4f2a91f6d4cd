//! Reconciliation engine.
//!
//! All aggregation is done in bytes (`u64`). The database's own megabyte
//! column is summed separately and reported for parity, but never enters the
//! discrepancy. Conversion to MB/GB happens only when formatting a report.

use std::collections::{BTreeMap, HashSet};

use lumora_shared::types::{CategoryRule, OrphanCategory};
use rust_decimal::Decimal;
use tracing::debug;

use super::classifier::Classifier;
use super::types::{
    CategoryTotals, DatabaseAggregate, FileRecord, MissingAggregate, OrphanAggregate,
    OrphanedObject, ReconciliationResult, RemoteObject, StoreAggregate,
};

/// Joins a database snapshot with a store snapshot.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    classifier: Classifier,
    sample_size: usize,
    scope_prefix: Option<String>,
}

impl ReconciliationEngine {
    /// Default number of sampled keys.
    pub const DEFAULT_SAMPLE_SIZE: usize = 10;

    /// Create an engine.
    #[must_use]
    pub fn new(classifier: Classifier, sample_size: usize) -> Self {
        Self {
            classifier,
            sample_size,
            scope_prefix: None,
        }
    }

    /// Create an engine from an optional rule override.
    #[must_use]
    pub fn from_rules(rules: Option<Vec<CategoryRule>>, sample_size: usize) -> Self {
        let classifier = rules.map_or_else(Classifier::default, Classifier::new);
        Self::new(classifier, sample_size)
    }

    /// Restrict missing-object detection to records under the listed prefix.
    /// The prefix is carried into the result.
    #[must_use]
    pub fn with_scope_prefix(mut self, prefix: Option<String>) -> Self {
        self.scope_prefix = prefix;
        self
    }

    /// Totals over the database snapshot alone.
    #[must_use]
    pub fn aggregate_database(records: &[FileRecord]) -> DatabaseAggregate {
        summarize_records(records, &record_keys(records))
    }

    /// Reconcile the two snapshots.
    ///
    /// Never fails; empty inputs produce all-zero aggregates. The result is
    /// independent of the order of either input.
    #[must_use]
    pub fn reconcile(
        &self,
        records: &[FileRecord],
        objects: &[RemoteObject],
    ) -> ReconciliationResult {
        let keys = record_keys(records);
        let database = summarize_records(records, &keys);

        let store = StoreAggregate {
            object_count: objects.len(),
            total_size_bytes: saturating_total(objects.iter().map(|o| o.size_bytes)),
        };

        let orphaned = self.collect_orphans(objects, &keys);
        let missing = self.collect_missing(records, objects);
        let discrepancy_bytes = signed_difference(store.total_size_bytes, database.total_size_bytes);

        debug!(
            records = database.record_count,
            objects = store.object_count,
            orphaned = orphaned.count,
            missing = missing.count,
            duplicate_keys = database.duplicate_key_count,
            discrepancy_bytes,
            "Reconciled snapshots"
        );

        ReconciliationResult {
            database,
            store,
            orphaned,
            missing,
            discrepancy_bytes,
            scope_prefix: self.scope_prefix.clone(),
        }
    }

    fn collect_orphans(&self, objects: &[RemoteObject], keys: &HashSet<&str>) -> OrphanAggregate {
        let mut orphans: Vec<OrphanedObject> = objects
            .iter()
            .filter(|o| !keys.contains(o.key.as_str()))
            .map(|o| OrphanedObject {
                key: o.key.clone(),
                size_bytes: o.size_bytes,
                category: self.classifier.classify(&o.key),
            })
            .collect();
        orphans.sort_by(|a, b| a.key.cmp(&b.key).then(a.size_bytes.cmp(&b.size_bytes)));

        let mut categories: BTreeMap<OrphanCategory, CategoryTotals> = OrphanCategory::ALL
            .into_iter()
            .map(|c| (c, CategoryTotals::default()))
            .collect();
        for orphan in &orphans {
            let totals = categories.entry(orphan.category).or_default();
            totals.count += 1;
            totals.total_size_bytes = totals.total_size_bytes.saturating_add(orphan.size_bytes);
        }

        OrphanAggregate {
            count: orphans.len(),
            total_size_bytes: saturating_total(orphans.iter().map(|o| o.size_bytes)),
            sample_keys: orphans
                .iter()
                .take(self.sample_size)
                .map(|o| o.key.clone())
                .collect(),
            categories,
            objects: orphans,
        }
    }

    fn collect_missing(&self, records: &[FileRecord], objects: &[RemoteObject]) -> MissingAggregate {
        let present: HashSet<&str> = objects.iter().map(|o| o.key.as_str()).collect();

        let mut missing: Vec<(&str, u64)> = records
            .iter()
            .filter_map(|r| r.storage_key.as_deref().map(|k| (k, r.size_bytes)))
            .filter(|(key, _)| self.in_scope(key) && !present.contains(key))
            .collect();
        missing.sort_unstable();

        let mut sample_keys: Vec<String> = Vec::new();
        for (key, _) in &missing {
            if sample_keys.len() == self.sample_size {
                break;
            }
            if sample_keys.last().map(String::as_str) != Some(*key) {
                sample_keys.push((*key).to_string());
            }
        }

        MissingAggregate {
            count: missing.len(),
            total_size_bytes: saturating_total(missing.iter().map(|(_, size)| *size)),
            sample_keys,
        }
    }

    fn in_scope(&self, key: &str) -> bool {
        self.scope_prefix
            .as_deref()
            .is_none_or(|prefix| key.starts_with(prefix))
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new(Classifier::default(), Self::DEFAULT_SAMPLE_SIZE)
    }
}

/// Distinct non-null storage keys referenced by records.
fn record_keys(records: &[FileRecord]) -> HashSet<&str> {
    records
        .iter()
        .filter_map(|r| r.storage_key.as_deref())
        .collect()
}

fn summarize_records(records: &[FileRecord], keys: &HashSet<&str>) -> DatabaseAggregate {
    let keyed = records.iter().filter(|r| r.storage_key.is_some()).count();

    DatabaseAggregate {
        record_count: records.len(),
        total_size_bytes: saturating_total(records.iter().map(|r| r.size_bytes)),
        total_size_mb: records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.size_mb)),
        records_without_key: records.len() - keyed,
        duplicate_key_count: keyed - keys.len(),
        malformed_record_count: records.iter().filter(|r| r.has_malformed_size).count(),
    }
}

/// Byte total that clamps at `u64::MAX` instead of overflowing.
fn saturating_total(sizes: impl Iterator<Item = u64>) -> u64 {
    sizes.fold(0, u64::saturating_add)
}

fn signed_difference(store_bytes: u64, database_bytes: u64) -> i64 {
    let diff = i128::from(store_bytes) - i128::from(database_bytes);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lumora_shared::types::BYTES_PER_MEGABYTE;
    use rust_decimal_macros::dec;

    const MB: u64 = BYTES_PER_MEGABYTE;

    fn record(key: Option<&str>, size_bytes: u64) -> FileRecord {
        FileRecord {
            owner_id: "owner-1".to_string(),
            session_id: Some("session-1".to_string()),
            filename: key.unwrap_or("pending.jpg").to_string(),
            storage_key: key.map(String::from),
            size_bytes,
            size_mb: Decimal::from(size_bytes) / Decimal::from(MB),
            folder: Some("gallery".to_string()),
            uploaded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            has_malformed_size: false,
        }
    }

    #[test]
    fn test_worked_example() {
        let records = vec![record(Some("A"), 10 * MB), record(Some("B"), 20 * MB)];
        let objects = vec![
            RemoteObject::new("A", 10 * MB),
            RemoteObject::new("B", 20 * MB),
            RemoteObject::new("C_thumbnails/x_sm.jpg", MB),
            RemoteObject::new("D", 50 * MB),
        ];

        let result = ReconciliationEngine::default().reconcile(&records, &objects);

        assert_eq!(result.database.record_count, 2);
        assert_eq!(result.database.total_size_bytes, 30 * MB);
        assert_eq!(result.database.total_size_mb, dec!(30));
        assert_eq!(result.store.object_count, 4);
        assert_eq!(result.store.total_size_bytes, 81 * MB);

        assert_eq!(result.orphaned.count, 2);
        assert_eq!(result.orphaned.total_size_bytes, 51 * MB);
        assert_eq!(
            result.orphaned.sample_keys,
            vec!["C_thumbnails/x_sm.jpg".to_string(), "D".to_string()]
        );
        assert_eq!(
            result.orphaned.categories[&OrphanCategory::Thumbnails],
            CategoryTotals {
                count: 1,
                total_size_bytes: MB
            }
        );
        assert_eq!(
            result.orphaned.categories[&OrphanCategory::Unknown],
            CategoryTotals {
                count: 1,
                total_size_bytes: 50 * MB
            }
        );
        assert_eq!(result.discrepancy_bytes, i64::try_from(51 * MB).unwrap());
        assert_eq!(result.missing.count, 0);
    }

    #[test]
    fn test_empty_inputs_are_all_zero() {
        let result = ReconciliationEngine::default().reconcile(&[], &[]);

        assert_eq!(result.database, DatabaseAggregate::default());
        assert_eq!(result.store, StoreAggregate::default());
        assert_eq!(result.orphaned.count, 0);
        assert_eq!(result.orphaned.total_size_bytes, 0);
        assert!(result.orphaned.objects.is_empty());
        assert!(result.orphaned.sample_keys.is_empty());
        assert_eq!(result.orphaned.categories.len(), OrphanCategory::ALL.len());
        assert!(
            result
                .orphaned
                .categories
                .values()
                .all(|t| *t == CategoryTotals::default())
        );
        assert_eq!(result.missing, MissingAggregate::default());
        assert_eq!(result.discrepancy_bytes, 0);
    }

    #[test]
    fn test_records_without_key_never_match() {
        let records = vec![record(None, 5), record(Some("kept.jpg"), 7)];
        let objects = vec![RemoteObject::new("kept.jpg", 7), RemoteObject::new("x", 1)];

        let result = ReconciliationEngine::default().reconcile(&records, &objects);

        assert_eq!(result.database.records_without_key, 1);
        assert_eq!(result.orphaned.count, 1);
        assert_eq!(result.orphaned.objects[0].key, "x");
    }

    #[test]
    fn test_duplicate_keys_are_counted_not_rejected() {
        let records = vec![
            record(Some("dup.jpg"), 4),
            record(Some("dup.jpg"), 4),
            record(Some("dup.jpg"), 4),
            record(Some("solo.jpg"), 1),
        ];
        let objects = vec![RemoteObject::new("dup.jpg", 4), RemoteObject::new("solo.jpg", 1)];

        let result = ReconciliationEngine::default().reconcile(&records, &objects);

        assert_eq!(result.database.duplicate_key_count, 2);
        assert_eq!(result.database.total_size_bytes, 13);
        assert_eq!(result.orphaned.count, 0);
    }

    #[test]
    fn test_malformed_records_are_counted() {
        let mut bad = record(Some("a"), 0);
        bad.has_malformed_size = true;
        let records = vec![bad, record(Some("b"), 3)];

        let aggregate = ReconciliationEngine::aggregate_database(&records);
        assert_eq!(aggregate.malformed_record_count, 1);
        assert_eq!(aggregate.total_size_bytes, 3);
    }

    #[test]
    fn test_sample_is_bounded_and_sorted() {
        let objects: Vec<_> = (0..25)
            .rev()
            .map(|i| RemoteObject::new(format!("orphan-{i:02}"), 1))
            .collect();

        let engine = ReconciliationEngine::new(Classifier::default(), 10);
        let result = engine.reconcile(&[], &objects);

        assert_eq!(result.orphaned.count, 25);
        assert_eq!(result.orphaned.sample_keys.len(), 10);
        assert_eq!(result.orphaned.sample_keys[0], "orphan-00");
        assert_eq!(result.orphaned.sample_keys[9], "orphan-09");
    }

    #[test]
    fn test_missing_objects_detected() {
        let records = vec![
            record(Some("photographers/p1/a.jpg"), 10),
            record(Some("photographers/p1/b.jpg"), 20),
            record(Some("clients/c1/c.jpg"), 30),
        ];
        let objects = vec![RemoteObject::new("photographers/p1/a.jpg", 10)];

        let unscoped = ReconciliationEngine::default().reconcile(&records, &objects);
        assert_eq!(unscoped.missing.count, 2);
        assert_eq!(unscoped.missing.total_size_bytes, 50);
        assert_eq!(
            unscoped.missing.sample_keys,
            vec![
                "clients/c1/c.jpg".to_string(),
                "photographers/p1/b.jpg".to_string()
            ]
        );

        let scoped = ReconciliationEngine::default()
            .with_scope_prefix(Some("photographers/".to_string()))
            .reconcile(&records, &objects);
        assert_eq!(scoped.missing.count, 1);
        assert_eq!(scoped.missing.sample_keys, vec!["photographers/p1/b.jpg".to_string()]);
        assert_eq!(scoped.scope_prefix.as_deref(), Some("photographers/"));
        assert_eq!(unscoped.scope_prefix, None);
    }

    #[test]
    fn test_negative_discrepancy() {
        let records = vec![record(Some("a"), 100)];
        let objects = vec![RemoteObject::new("a", 40)];
        let result = ReconciliationEngine::default().reconcile(&records, &objects);
        assert_eq!(result.discrepancy_bytes, -60);
    }

    #[test]
    fn test_signed_difference_saturates() {
        assert_eq!(signed_difference(u64::MAX, 0), i64::MAX);
        assert_eq!(signed_difference(0, u64::MAX), i64::MIN);
    }

    #[test]
    fn test_huge_sizes_saturate() {
        let records = vec![record(Some("a"), u64::MAX), record(Some("b"), 1)];
        let objects = vec![
            RemoteObject::new("a", u64::MAX),
            RemoteObject::new("x", u64::MAX),
            RemoteObject::new("y", 2),
        ];

        let result = ReconciliationEngine::default().reconcile(&records, &objects);

        assert_eq!(result.database.total_size_bytes, u64::MAX);
        assert_eq!(result.store.total_size_bytes, u64::MAX);
        assert_eq!(result.orphaned.total_size_bytes, u64::MAX);
        assert_eq!(
            result.orphaned.categories[&OrphanCategory::Unknown].total_size_bytes,
            u64::MAX
        );
        assert_eq!(result.missing.total_size_bytes, 1);
        assert_eq!(result.discrepancy_bytes, 0);

        let missing = ReconciliationEngine::default().reconcile(&records, &[]);
        assert_eq!(missing.missing.total_size_bytes, u64::MAX);

        let mut huge_mb = record(Some("m"), 0);
        huge_mb.size_mb = Decimal::MAX;
        let aggregate = ReconciliationEngine::aggregate_database(&[huge_mb.clone(), huge_mb]);
        assert_eq!(aggregate.total_size_mb, Decimal::MAX);
    }

    #[test]
    fn test_rule_override() {
        let rules = vec![CategoryRule::new(
            OrphanCategory::BackupIndexes,
            vec![lumora_shared::types::KeyPattern::contains(".bak")],
        )];
        let engine = ReconciliationEngine::from_rules(Some(rules), 10);
        let result = engine.reconcile(&[], &[RemoteObject::new("db.bak", 2)]);
        assert_eq!(
            result.orphaned.categories[&OrphanCategory::BackupIndexes].count,
            1
        );
    }
}

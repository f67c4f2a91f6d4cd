//! Property-based tests for the reconciliation engine.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use lumora_shared::types::OrphanCategory;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::ReconciliationEngine;
use super::types::{FileRecord, RemoteObject};

/// Strategy for keys drawn from a small alphabet so sets overlap often.
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-d]{1,3}",
        "thumbnails/[a-c]{1,2}",
        "photographers/p[0-2]/sessions/s[0-2]/[a-c]\\.jpg",
        "[a-c]{1,2}_sm\\.jpg",
        "backups/[a-b]/backup_index\\.json",
    ]
}

fn make_record(key: Option<String>, size_bytes: u64) -> FileRecord {
    FileRecord {
        owner_id: "owner".to_string(),
        session_id: None,
        filename: "file.jpg".to_string(),
        storage_key: key,
        size_bytes,
        size_mb: Decimal::ZERO,
        folder: None,
        uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        has_malformed_size: false,
    }
}

fn records_strategy() -> impl Strategy<Value = Vec<FileRecord>> {
    prop::collection::vec(
        (prop::option::of(key_strategy()), 0u64..1_000_000),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(key, size)| make_record(key, size))
            .collect()
    })
}

/// Store listings have unique keys.
fn objects_strategy() -> impl Strategy<Value = Vec<RemoteObject>> {
    prop::collection::hash_map(key_strategy(), 0u64..1_000_000, 0..30).prop_map(|m| {
        m.into_iter()
            .map(|(key, size)| RemoteObject::new(key, size))
            .collect()
    })
}

/// A vector paired with an arbitrary permutation of itself.
fn shuffled<T: Clone + std::fmt::Debug>(
    inner: impl Strategy<Value = Vec<T>>,
) -> impl Strategy<Value = (Vec<T>, Vec<T>)> {
    inner.prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An object is orphaned exactly when no record references its key.
    #[test]
    fn prop_orphan_iff_unreferenced(
        records in records_strategy(),
        objects in objects_strategy(),
    ) {
        let result = ReconciliationEngine::default().reconcile(&records, &objects);
        let referenced: HashSet<&str> = records
            .iter()
            .filter_map(|r| r.storage_key.as_deref())
            .collect();
        let orphaned: HashSet<&str> = result
            .orphaned
            .objects
            .iter()
            .map(|o| o.key.as_str())
            .collect();

        for object in &objects {
            prop_assert_eq!(
                orphaned.contains(object.key.as_str()),
                !referenced.contains(object.key.as_str()),
                "key {}", object.key
            );
        }
        prop_assert_eq!(result.orphaned.count, orphaned.len());
    }

    /// Category totals partition the orphan totals.
    #[test]
    fn prop_categories_partition_orphans(
        records in records_strategy(),
        objects in objects_strategy(),
    ) {
        let result = ReconciliationEngine::default().reconcile(&records, &objects);
        let orphaned = &result.orphaned;

        prop_assert_eq!(orphaned.categories.len(), OrphanCategory::ALL.len());
        let count: usize = orphaned.categories.values().map(|t| t.count).sum();
        let bytes: u64 = orphaned.categories.values().map(|t| t.total_size_bytes).sum();
        prop_assert_eq!(count, orphaned.count);
        prop_assert_eq!(bytes, orphaned.total_size_bytes);
        prop_assert!(orphaned.total_size_bytes <= result.store.total_size_bytes);
        prop_assert!(orphaned.sample_keys.len() <= ReconciliationEngine::DEFAULT_SAMPLE_SIZE);
    }

    /// Discrepancy is the signed difference of the two totals.
    #[test]
    fn prop_discrepancy_is_signed_difference(
        records in records_strategy(),
        objects in objects_strategy(),
    ) {
        let result = ReconciliationEngine::default().reconcile(&records, &objects);
        let expected = i128::from(result.store.total_size_bytes)
            - i128::from(result.database.total_size_bytes);
        prop_assert_eq!(i128::from(result.discrepancy_bytes), expected);
    }

    /// Input order does not change the result.
    #[test]
    fn prop_order_independent(
        (records, records_shuffled) in shuffled(records_strategy()),
        (objects, objects_shuffled) in shuffled(objects_strategy()),
    ) {
        let engine = ReconciliationEngine::default();
        prop_assert_eq!(
            engine.reconcile(&records, &objects),
            engine.reconcile(&records_shuffled, &objects_shuffled)
        );
    }

    /// Repeated runs over the same snapshots agree.
    #[test]
    fn prop_idempotent(
        records in records_strategy(),
        objects in objects_strategy(),
    ) {
        let engine = ReconciliationEngine::default();
        prop_assert_eq!(
            engine.reconcile(&records, &objects),
            engine.reconcile(&records, &objects)
        );
    }

    /// Duplicate count is keyed records minus distinct keys.
    #[test]
    fn prop_duplicate_key_count(records in records_strategy()) {
        let aggregate = ReconciliationEngine::aggregate_database(&records);
        let keyed = records.iter().filter(|r| r.storage_key.is_some()).count();
        let distinct: HashSet<&str> = records
            .iter()
            .filter_map(|r| r.storage_key.as_deref())
            .collect();

        prop_assert_eq!(aggregate.duplicate_key_count, keyed - distinct.len());
        prop_assert_eq!(aggregate.records_without_key, records.len() - keyed);
    }
}

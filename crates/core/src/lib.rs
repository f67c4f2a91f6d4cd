//! Core reconciliation logic for Lumora.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//! The relational store is reached through the [`reconciliation::FileRecordSource`]
//! trait; the object store through [`storage::ObjectListing`].
//!
//! # Modules
//!
//! - `storage` - Object store access via OpenDAL and paginated listing
//! - `reconciliation` - Orphan detection, classification and aggregation
//! - `report` - Structured payloads and text summaries

pub mod reconciliation;
pub mod report;
pub mod storage;

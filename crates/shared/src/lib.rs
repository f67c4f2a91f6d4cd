//! Shared types, errors, and configuration for Lumora.
//!
//! This crate provides common types used across all other crates:
//! - Orphan categories and key patterns for storage classification
//! - Byte-size unit conversions
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, AuditConfig, StorageProvider};
pub use error::AppError;

//! Object store listing using Apache OpenDAL.
//!
//! This module enumerates the objects that currently exist in the remote store:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    list_all_objects(prefix)                      │
//! │        follows continuation tokens until exhaustion              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                 ObjectListing::list_page                         │
//! │  StorageService: op.lister_with(prefix).start_after(token)       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod listing;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use listing::{ListPage, ObjectListing, RemoteObject, list_all_objects};
pub use service::StorageService;

//! Common types used across the application.

pub mod category;
pub mod size;

pub use category::{CategoryRule, KeyPattern, LEGACY_KEY_MIN_LENGTH, OrphanCategory};
pub use size::{
    BYTES_PER_GIGABYTE, BYTES_PER_MEGABYTE, bytes_to_gigabytes, bytes_to_megabytes,
    signed_bytes_to_gigabytes, signed_bytes_to_megabytes,
};

//! Byte-size unit conversions.
//!
//! Aggregates are always kept in bytes. These helpers convert to binary
//! megabytes and gigabytes for presentation only.

use rust_decimal::Decimal;

/// Bytes in one megabyte (2^20).
pub const BYTES_PER_MEGABYTE: u64 = 1 << 20;

/// Bytes in one gigabyte (2^30).
pub const BYTES_PER_GIGABYTE: u64 = 1 << 30;

/// Convert bytes to megabytes.
#[must_use]
pub fn bytes_to_megabytes(bytes: u64) -> Decimal {
    Decimal::from(bytes) / Decimal::from(BYTES_PER_MEGABYTE)
}

/// Convert bytes to gigabytes.
#[must_use]
pub fn bytes_to_gigabytes(bytes: u64) -> Decimal {
    Decimal::from(bytes) / Decimal::from(BYTES_PER_GIGABYTE)
}

/// Convert a signed byte difference to megabytes.
#[must_use]
pub fn signed_bytes_to_megabytes(bytes: i64) -> Decimal {
    Decimal::from(bytes) / Decimal::from(BYTES_PER_MEGABYTE)
}

/// Convert a signed byte difference to gigabytes.
#[must_use]
pub fn signed_bytes_to_gigabytes(bytes: i64) -> Decimal {
    Decimal::from(bytes) / Decimal::from(BYTES_PER_GIGABYTE)
}

//! Defensive parsing of size columns.
//!
//! Legacy rows store sizes as free-form text. A missing value counts as zero;
//! a value that is present but non-numeric or negative also counts as zero and
//! marks the row as malformed.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Outcome of parsing one size column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField<T> {
    /// Column was NULL or blank.
    Missing,
    /// Column parsed cleanly.
    Valid(T),
    /// Column held something that is not a non-negative number.
    Malformed,
}

impl<T: Default> SizeField<T> {
    /// Parsed value, or zero.
    pub fn value(self) -> T {
        match self {
            Self::Valid(v) => v,
            Self::Missing | Self::Malformed => T::default(),
        }
    }
}

impl<T> SizeField<T> {
    /// Whether the column was present but unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// Parse a byte-size column.
///
/// Fractional values such as `"1024.0"` are truncated.
#[must_use]
pub fn parse_size_bytes(raw: Option<&str>) -> SizeField<u64> {
    let Some(text) = non_blank(raw) else {
        return SizeField::Missing;
    };

    if let Ok(bytes) = text.parse::<u64>() {
        return SizeField::Valid(bytes);
    }

    match Decimal::from_str(text) {
        Ok(d) if !d.is_sign_negative() => d
            .trunc()
            .to_u64()
            .map_or(SizeField::Malformed, SizeField::Valid),
        _ => SizeField::Malformed,
    }
}

/// Parse a megabyte-size column.
#[must_use]
pub fn parse_size_mb(raw: Option<&str>) -> SizeField<Decimal> {
    let Some(text) = non_blank(raw) else {
        return SizeField::Missing;
    };

    match Decimal::from_str(text) {
        Ok(d) if !d.is_sign_negative() => SizeField::Valid(d),
        _ => SizeField::Malformed,
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

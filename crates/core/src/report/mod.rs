//! Reconciliation reports.
//!
//! Turns a run outcome into:
//! - A structured JSON payload for programmatic callers
//! - A multi-line text summary for operators

pub mod formatter;
pub mod types;


pub use formatter::{DISPLAY_DECIMAL_PLACES, ReportFormatter};
pub use types::*;

//! Temperature-logging core for a refrigerator dashboard.
//!
//! Raw morning/evening readings live in SQLite. The [`aggregate`] module
//! folds a month of readings into per-day and per-month statistics for
//! charts and tables, and the archival path in [`db`] moves a reading to an
//! append-only deleted-log audit trail in a single transaction.

pub mod aggregate;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod insights;

pub use db::models::{DeletedReading, Period, Reading};
pub use db::Database;
pub use error::{Error, Result};

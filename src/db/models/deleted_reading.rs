//! Audit-trail copy of a reading taken at the moment of deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reading::{Period, Reading};

/// Sentinel adder id for rows that predate the audit columns.
pub const UNKNOWN_ADDER_ID: &str = "unknown_original_adder_uid";

/// Terminal audit state of a reading. Created exclusively by the archive
/// transaction; never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedReading {
    pub id: String,
    pub owner_id: String,
    pub timestamp: DateTime<Utc>,
    pub period: Period,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub average_temperature: Option<f64>,
    pub added_by_user_id: String,
    pub added_by_user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: DateTime<Utc>,
    pub original_id: String,
    pub deleted_by_user_id: String,
    pub deleted_by_user_name: Option<String>,
}

impl DeletedReading {
    /// Snapshot of a live reading plus deletion metadata.
    ///
    /// Fields that rows from older schema revisions may lack are defaulted
    /// here instead of failing the archive: a missing adder id becomes
    /// [`UNKNOWN_ADDER_ID`] and a missing creation time becomes the deletion
    /// instant.
    pub fn from_reading(
        reading: &Reading,
        deleted_by_user_id: &str,
        deleted_by_user_name: Option<&str>,
        deleted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: reading.owner_id.clone(),
            timestamp: reading.timestamp,
            period: reading.period,
            min_temperature: reading.min_temperature,
            max_temperature: reading.max_temperature,
            average_temperature: reading.average_temperature,
            added_by_user_id: reading
                .added_by_user_id
                .clone()
                .unwrap_or_else(|| UNKNOWN_ADDER_ID.to_string()),
            added_by_user_name: reading.added_by_user_name.clone(),
            created_at: reading.created_at.unwrap_or(deleted_at),
            deleted_at,
            original_id: reading.id.clone(),
            deleted_by_user_id: deleted_by_user_id.to_string(),
            deleted_by_user_name: deleted_by_user_name.map(str::to_string),
        }
    }
}

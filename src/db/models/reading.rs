//! Raw temperature log data model.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Morning/evening classification of a reading.
///
/// Derived once from the hour-of-day when the log is written and stored with
/// it. Stored labels are never reclassified, so historical rows keep their
/// original period even if the window boundaries change later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Evening,
    Other,
}

impl Period {
    /// 05:00-11:59 is morning, 17:00-21:59 is evening, anything else is other.
    pub fn for_timestamp(timestamp: DateTime<Utc>) -> Self {
        match timestamp.hour() {
            5..=11 => Period::Morning,
            17..=21 => Period::Evening,
            _ => Period::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Evening => "evening",
            Period::Other => "other",
        }
    }
}

/// One morning or evening temperature observation.
///
/// `timestamp` is the wall-clock instant the reading was taken, not the
/// instant it was recorded; `created_at` is the store-assigned write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: String,
    pub owner_id: String,
    pub timestamp: DateTime<Utc>,
    pub period: Period,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    /// Midpoint of min/max, or whichever bound is present. Computed once at
    /// write time.
    pub average_temperature: Option<f64>,
    /// Rows written before the audit columns existed carry no adder.
    pub added_by_user_id: Option<String>,
    pub added_by_user_name: Option<String>,
    /// Nullable for the same schema-drift reason.
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, hour, 30, 0).unwrap()
    }

    #[test]
    fn classifies_morning_window() {
        assert_eq!(Period::for_timestamp(at_hour(5)), Period::Morning);
        assert_eq!(Period::for_timestamp(at_hour(8)), Period::Morning);
        assert_eq!(Period::for_timestamp(at_hour(11)), Period::Morning);
    }

    #[test]
    fn classifies_evening_window() {
        assert_eq!(Period::for_timestamp(at_hour(17)), Period::Evening);
        assert_eq!(Period::for_timestamp(at_hour(21)), Period::Evening);
    }

    #[test]
    fn hours_outside_both_windows_are_other() {
        assert_eq!(Period::for_timestamp(at_hour(4)), Period::Other);
        assert_eq!(Period::for_timestamp(at_hour(12)), Period::Other);
        assert_eq!(Period::for_timestamp(at_hour(16)), Period::Other);
        assert_eq!(Period::for_timestamp(at_hour(22)), Period::Other);
        assert_eq!(Period::for_timestamp(at_hour(0)), Period::Other);
    }
}

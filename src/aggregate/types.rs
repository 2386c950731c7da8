use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::models::Period;

/// Combined statistics for one period of one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// Mean of the contributing averages, rounded to one decimal. `None` when
    /// no reading in the day/period carried an average.
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-calendar-day combination of all readings, one summary per period.
/// Derived on every query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub morning: PeriodSummary,
    pub evening: PeriodSummary,
}

impl DailyAggregate {
    /// Summary for the given period; off-window readings have no aggregate.
    pub fn period(&self, period: Period) -> Option<&PeriodSummary> {
        match period {
            Period::Morning => Some(&self.morning),
            Period::Evening => Some(&self.evening),
            Period::Other => None,
        }
    }
}

/// Month-level statistics for one period, weighted by day rather than by
/// reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Mean of the per-day means, each day weighted once.
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Days (not readings) with at least one qualifying value.
    pub count: u32,
}

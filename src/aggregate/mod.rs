//! Pure aggregation of raw readings into daily and monthly statistics.
//!
//! Nothing here touches the store: both operations are deterministic folds
//! over in-memory sequences and are safe to rerun at any time.

mod types;

pub use types::{DailyAggregate, MonthlySummary, PeriodSummary};

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::db::models::{Period, Reading};

/// Round half away from zero at one decimal place, matching the fixed
/// one-decimal display convention.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Midpoint of min/max when both bounds are present, otherwise whichever
/// bound exists. Computed once when a log is written, never re-derived.
pub fn average_of_bounds(min: Option<f64>, max: Option<f64>) -> Option<f64> {
    match (min, max) {
        (Some(min), Some(max)) => Some(round_to_tenth((min + max) / 2.0)),
        (Some(min), None) => Some(round_to_tenth(min)),
        (None, Some(max)) => Some(round_to_tenth(max)),
        (None, None) => None,
    }
}

#[derive(Default)]
struct PeriodAccumulator {
    sum: f64,
    count: u32,
    min: Option<f64>,
    max: Option<f64>,
}

impl PeriodAccumulator {
    fn add(&mut self, reading: &Reading) {
        if let Some(average) = reading.average_temperature {
            self.sum += average;
            self.count += 1;
        }
        // min/max are tracked independently of the average: a reading can
        // contribute a bound without contributing to the day's mean.
        if let Some(value) = reading.min_temperature {
            self.min = Some(self.min.map_or(value, |current| current.min(value)));
        }
        if let Some(value) = reading.max_temperature {
            self.max = Some(self.max.map_or(value, |current| current.max(value)));
        }
    }

    fn summary(&self) -> PeriodSummary {
        PeriodSummary {
            mean: (self.count > 0).then(|| round_to_tenth(self.sum / f64::from(self.count))),
            min: self.min,
            max: self.max,
        }
    }
}

/// Fold readings into one aggregate per calendar day, sorted ascending by
/// date.
///
/// The input need not be sorted or restricted to one month; the caller is
/// responsible for range-filtering. Readings classified as `Other` stay
/// visible in raw list views but are excluded from every aggregate.
pub fn aggregate_by_day(readings: &[Reading]) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, (PeriodAccumulator, PeriodAccumulator)> = BTreeMap::new();

    for reading in readings {
        if reading.period == Period::Other {
            continue;
        }
        let bucket = days.entry(reading.timestamp.date_naive()).or_default();
        let accumulator = match reading.period {
            Period::Morning => &mut bucket.0,
            _ => &mut bucket.1,
        };
        accumulator.add(reading);
    }

    days.into_iter()
        .map(|(date, (morning, evening))| DailyAggregate {
            date,
            morning: morning.summary(),
            evening: evening.summary(),
        })
        .collect()
}

/// Reduce daily aggregates into one statistic for the whole range.
///
/// Each day is weighted equally regardless of how many readings it had; min
/// and max are the extremes of the per-day bounds; count is the number of
/// days with at least one qualifying value for the period.
pub fn summarize_month(days: &[DailyAggregate], period: Period) -> MonthlySummary {
    let mut mean_sum = 0.0;
    let mut mean_count = 0u32;
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut days_with_readings = 0u32;

    for day in days {
        let Some(summary) = day.period(period) else {
            continue;
        };

        let mut has_reading = false;
        if let Some(mean) = summary.mean {
            mean_sum += mean;
            mean_count += 1;
            has_reading = true;
        }
        if let Some(value) = summary.min {
            min = Some(min.map_or(value, |current| current.min(value)));
            has_reading = true;
        }
        if let Some(value) = summary.max {
            max = Some(max.map_or(value, |current| current.max(value)));
            has_reading = true;
        }
        if has_reading {
            days_with_readings += 1;
        }
    }

    MonthlySummary {
        average: (mean_count > 0).then(|| round_to_tenth(mean_sum / f64::from(mean_count))),
        min,
        max,
        count: days_with_readings,
    }
}

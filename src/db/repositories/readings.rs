use anyhow::Result as AnyResult;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::warn;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::aggregate::average_of_bounds;
use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime, parse_period},
    models::{Period, Reading},
};
use crate::error::{Error, Result};

pub(crate) const READING_COLUMNS: &str = "id, owner_id, timestamp, period, min_temperature, \
     max_temperature, average_temperature, added_by_user_id, added_by_user_name, created_at";

pub(crate) fn row_to_reading(row: &Row) -> AnyResult<Reading> {
    let timestamp: String = row.get("timestamp")?;
    let period: String = row.get("period")?;
    let created_at: Option<String> = row.get("created_at")?;

    Ok(Reading {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        period: parse_period(&period)?,
        min_temperature: row.get("min_temperature")?,
        max_temperature: row.get("max_temperature")?,
        average_temperature: row.get("average_temperature")?,
        added_by_user_id: row.get("added_by_user_id")?,
        added_by_user_name: row.get("added_by_user_name")?,
        created_at: parse_optional_datetime(created_at, "created_at")?,
    })
}

/// Half-open UTC range covering one calendar month.
fn month_range(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || Error::Validation(format!("invalid month {year}-{month:02}"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

impl Database {
    /// Record a new temperature log.
    ///
    /// The period is classified from the timestamp's hour-of-day and the
    /// average is computed from the bounds, both exactly once, here. At least
    /// one of min/max is required.
    pub async fn add_reading(
        &self,
        owner_id: &str,
        timestamp: DateTime<Utc>,
        min_temperature: Option<f64>,
        max_temperature: Option<f64>,
        added_by_user_id: &str,
        added_by_user_name: Option<&str>,
    ) -> Result<Reading> {
        if owner_id.is_empty() || added_by_user_id.is_empty() {
            return Err(Error::Validation(
                "owner id and adding user id are required".into(),
            ));
        }
        if min_temperature.is_none() && max_temperature.is_none() {
            return Err(Error::Validation(
                "at least one of min/max temperature is required".into(),
            ));
        }
        if let (Some(min), Some(max)) = (min_temperature, max_temperature) {
            if min > max {
                return Err(Error::Validation(
                    "min temperature must not exceed max temperature".into(),
                ));
            }
        }

        let reading = Reading {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            timestamp,
            period: Period::for_timestamp(timestamp),
            min_temperature,
            max_temperature,
            average_temperature: average_of_bounds(min_temperature, max_temperature),
            added_by_user_id: Some(added_by_user_id.to_string()),
            added_by_user_name: added_by_user_name.map(str::to_string),
            created_at: Some(Utc::now()),
        };

        let record = reading.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO readings (id, owner_id, timestamp, period, min_temperature,
                     max_temperature, average_temperature, added_by_user_id,
                     added_by_user_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.owner_id,
                    record.timestamp.to_rfc3339(),
                    record.period.as_str(),
                    record.min_temperature,
                    record.max_temperature,
                    record.average_temperature,
                    record.added_by_user_id,
                    record.added_by_user_name,
                    record.created_at.as_ref().map(|dt| dt.to_rfc3339()),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(reading)
    }

    /// All readings for an owner within `[start, end)`, ascending by
    /// timestamp. Rows that fail to decode are skipped with a warning so one
    /// malformed record never aborts the whole query.
    pub async fn get_readings_in_range(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>> {
        let owner = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {READING_COLUMNS} FROM readings
                 WHERE owner_id = ?1 AND timestamp >= ?2 AND timestamp < ?3
                 ORDER BY timestamp ASC"
            ))?;

            let mut rows = stmt.query(params![owner, start.to_rfc3339(), end.to_rfc3339()])?;
            let mut readings = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_reading(row) {
                    Ok(reading) => readings.push(reading),
                    Err(err) => warn!("skipping unreadable temperature log: {err:#}"),
                }
            }

            Ok(readings)
        })
        .await
    }

    pub async fn get_readings_for_month(
        &self,
        owner_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Reading>> {
        let (start, end) = month_range(year, month)?;
        self.get_readings_in_range(owner_id, start, end).await
    }

    /// Every live reading for an owner, most recent first. Off-window
    /// ("other") readings are included here even though aggregation ignores
    /// them.
    pub async fn get_all_readings(&self, owner_id: &str) -> Result<Vec<Reading>> {
        let owner = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {READING_COLUMNS} FROM readings
                 WHERE owner_id = ?1
                 ORDER BY timestamp DESC"
            ))?;

            let mut rows = stmt.query(params![owner])?;
            let mut readings = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_reading(row) {
                    Ok(reading) => readings.push(reading),
                    Err(err) => warn!("skipping unreadable temperature log: {err:#}"),
                }
            }

            Ok(readings)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rusqlite::params;

    use super::*;
    use crate::db::test_util::open_test_db;

    #[test]
    fn month_range_covers_whole_month() {
        let (start, end) = month_range(2025, 6).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_range_rolls_over_december() {
        let (start, end) = month_range(2025, 12).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_range_rejects_invalid_month() {
        assert!(matches!(month_range(2025, 13), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn add_and_fetch_for_month() {
        let (_dir, db) = open_test_db();

        let morning = Utc.with_ymd_and_hms(2025, 6, 1, 7, 30, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 6, 2, 18, 0, 0).unwrap();

        let added = db
            .add_reading("U1", morning, Some(2.0), Some(4.0), "U1", Some("Ana"))
            .await
            .unwrap();
        assert_eq!(added.period, Period::Morning);
        assert_eq!(added.average_temperature, Some(3.0));

        db.add_reading("U1", evening, Some(1.0), None, "U1", None).await.unwrap();

        // A different owner's reading must not leak into the query.
        db.add_reading("U2", morning, Some(9.0), None, "U2", None).await.unwrap();

        let readings = db.get_readings_for_month("U1", 2025, 6).await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].timestamp, morning);
        assert_eq!(readings[1].timestamp, evening);
        assert_eq!(readings[1].period, Period::Evening);
        assert_eq!(readings[1].average_temperature, Some(1.0));
    }

    #[tokio::test]
    async fn add_requires_at_least_one_bound() {
        let (_dir, db) = open_test_db();
        let timestamp = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();

        let err = db.add_reading("U1", timestamp, None, None, "U1", None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = db.add_reading("", timestamp, Some(3.0), None, "U1", None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn add_rejects_inverted_bounds() {
        let (_dir, db) = open_test_db();
        let timestamp = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();

        let err = db
            .add_reading("U1", timestamp, Some(5.0), Some(2.0), "U1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_row_is_skipped_not_fatal() {
        let (_dir, db) = open_test_db();

        let good = Utc.with_ymd_and_hms(2025, 6, 10, 7, 0, 0).unwrap();
        db.add_reading("U1", good, Some(3.0), None, "U1", None).await.unwrap();

        // A row whose timestamp sorts into the queried range but is not a
        // parseable instant.
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO readings (id, owner_id, timestamp, period, min_temperature)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params!["bad", "U1", "2025-06-15Tnot-a-time", "morning", 3.0],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let readings = db.get_readings_for_month("U1", 2025, 6).await.unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].timestamp, good);
    }

    #[tokio::test]
    async fn get_all_readings_is_descending_and_keeps_other_period() {
        let (_dir, db) = open_test_db();

        let noon = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap();

        db.add_reading("U1", noon, Some(6.0), None, "U1", None).await.unwrap();
        db.add_reading("U1", morning, Some(3.0), None, "U1", None).await.unwrap();

        let readings = db.get_all_readings("U1").await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].timestamp, morning);
        assert_eq!(readings[1].period, Period::Other);
    }
}

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::db::models::Period;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_period(value: &str) -> Result<Period> {
    match value {
        "morning" => Ok(Period::Morning),
        "evening" => Ok(Period::Evening),
        "other" => Ok(Period::Other),
        other => Err(anyhow!("unknown period {other}")),
    }
}

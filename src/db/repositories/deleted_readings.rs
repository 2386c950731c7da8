use anyhow::Result as AnyResult;
use chrono::Utc;
use log::{info, warn};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_period},
    models::DeletedReading,
};
use crate::error::{Error, Result};

use super::readings::{row_to_reading, READING_COLUMNS};

fn row_to_deleted_reading(row: &Row) -> AnyResult<DeletedReading> {
    let timestamp: String = row.get("timestamp")?;
    let period: String = row.get("period")?;
    let created_at: String = row.get("created_at")?;
    let deleted_at: String = row.get("deleted_at")?;

    Ok(DeletedReading {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        period: parse_period(&period)?,
        min_temperature: row.get("min_temperature")?,
        max_temperature: row.get("max_temperature")?,
        average_temperature: row.get("average_temperature")?,
        added_by_user_id: row.get("added_by_user_id")?,
        added_by_user_name: row.get("added_by_user_name")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        deleted_at: parse_datetime(&deleted_at, "deleted_at")?,
        original_id: row.get("original_id")?,
        deleted_by_user_id: row.get("deleted_by_user_id")?,
        deleted_by_user_name: row.get("deleted_by_user_name")?,
    })
}

impl Database {
    /// Move one reading from the live set to the deleted-log audit trail.
    ///
    /// The snapshot insert and the live-row delete run in a single
    /// transaction; both apply or neither does, so no concurrent reader can
    /// observe the reading in both sets or in neither. Restoring archived
    /// readings is not supported.
    pub async fn archive_reading(
        &self,
        owner_id: &str,
        reading_id: &str,
        deleted_by_user_id: &str,
        deleted_by_user_name: Option<&str>,
    ) -> Result<()> {
        if owner_id.is_empty() || reading_id.is_empty() || deleted_by_user_id.is_empty() {
            return Err(Error::Validation(
                "owner id, log id and deleting user id are required".into(),
            ));
        }

        let owner = owner_id.to_string();
        let id = reading_id.to_string();
        let deleted_by = deleted_by_user_id.to_string();
        let deleted_by_name = deleted_by_user_name.map(str::to_string);

        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let reading = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {READING_COLUMNS} FROM readings
                     WHERE owner_id = ?1 AND id = ?2"
                ))?;
                let mut rows = stmt.query(params![owner, id])?;
                match rows.next()? {
                    Some(row) => row_to_reading(row).map_err(Error::Internal)?,
                    None => return Err(Error::NotFound),
                }
            };

            let deleted = DeletedReading::from_reading(
                &reading,
                &deleted_by,
                deleted_by_name.as_deref(),
                Utc::now(),
            );

            tx.execute(
                "INSERT INTO deleted_readings (id, owner_id, timestamp, period,
                     min_temperature, max_temperature, average_temperature,
                     added_by_user_id, added_by_user_name, created_at, deleted_at,
                     original_id, deleted_by_user_id, deleted_by_user_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    deleted.id,
                    deleted.owner_id,
                    deleted.timestamp.to_rfc3339(),
                    deleted.period.as_str(),
                    deleted.min_temperature,
                    deleted.max_temperature,
                    deleted.average_temperature,
                    deleted.added_by_user_id,
                    deleted.added_by_user_name,
                    deleted.created_at.to_rfc3339(),
                    deleted.deleted_at.to_rfc3339(),
                    deleted.original_id,
                    deleted.deleted_by_user_id,
                    deleted.deleted_by_user_name,
                ],
            )?;

            tx.execute(
                "DELETE FROM readings WHERE owner_id = ?1 AND id = ?2",
                params![owner, id],
            )?;

            tx.commit()?;

            info!(
                "archived temperature log {} for owner {}",
                deleted.original_id, deleted.owner_id
            );
            Ok(())
        })
        .await
    }

    /// Deleted-log entries for an owner, most recent deletion first.
    pub async fn get_deleted_readings(&self, owner_id: &str) -> Result<Vec<DeletedReading>> {
        let owner = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, timestamp, period, min_temperature, max_temperature,
                        average_temperature, added_by_user_id, added_by_user_name, created_at,
                        deleted_at, original_id, deleted_by_user_id, deleted_by_user_name
                 FROM deleted_readings
                 WHERE owner_id = ?1
                 ORDER BY deleted_at DESC",
            )?;

            let mut rows = stmt.query(params![owner])?;
            let mut deleted = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_deleted_reading(row) {
                    Ok(record) => deleted.push(record),
                    Err(err) => warn!("skipping unreadable deleted log: {err:#}"),
                }
            }

            Ok(deleted)
        })
        .await
    }
}

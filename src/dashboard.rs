//! Month-scoped fetch coordination for the dashboard view.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::debug;

use crate::db::models::Reading;
use crate::db::Database;
use crate::error::Result;

/// Generation-stamped month fetcher.
///
/// Rapid month navigation can leave several fetches in flight for the same
/// owner. Each fetch is stamped with a generation; a result that completes
/// after a newer fetch began is reported as stale (`Ok(None)`) so the caller
/// discards it instead of letting the slowest response win.
#[derive(Clone)]
pub struct MonthFetcher {
    db: Database,
    generation: Arc<AtomicU64>,
}

impl MonthFetcher {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch all readings for the owner's selected month. Returns `None` when
    /// a newer fetch superseded this one while it was in flight.
    pub async fn fetch_month(
        &self,
        owner_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<Vec<Reading>>> {
        let generation = self.begin();
        let readings = self.db.get_readings_for_month(owner_id, year, month).await?;

        if !self.is_current(generation) {
            debug!("discarding stale fetch for {year}-{month:02} (generation {generation})");
            return Ok(None);
        }

        Ok(Some(readings))
    }

    /// Drop every in-flight fetch, e.g. when the signed-in owner changes.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db::test_util::open_test_db;

    #[tokio::test]
    async fn current_fetch_returns_readings() {
        let (_dir, db) = open_test_db();
        let timestamp = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();
        db.add_reading("U1", timestamp, Some(3.0), None, "U1", None).await.unwrap();

        let fetcher = MonthFetcher::new(db);
        let readings = fetcher.fetch_month("U1", 2025, 6).await.unwrap();
        assert_eq!(readings.unwrap().len(), 1);

        // A later fetch is unaffected by earlier completed ones.
        let readings = fetcher.fetch_month("U1", 2025, 7).await.unwrap();
        assert_eq!(readings.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn superseded_generation_is_stale() {
        let (_dir, db) = open_test_db();
        let fetcher = MonthFetcher::new(db);

        let first = fetcher.begin();
        let second = fetcher.begin();
        assert!(!fetcher.is_current(first));
        assert!(fetcher.is_current(second));

        fetcher.invalidate();
        assert!(!fetcher.is_current(second));
    }
}

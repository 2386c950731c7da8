mod connection;
pub(crate) mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;

#[cfg(test)]
pub(crate) mod test_util {
    use tempfile::TempDir;

    use super::Database;

    pub(crate) fn open_test_db() -> (TempDir, Database) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().expect("create temp dir");
        let db = Database::new(dir.path().join("thermotrack.sqlite3")).expect("open database");
        (dir, db)
    }
}

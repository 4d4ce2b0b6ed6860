//! The storage engine as seen by the migration: something that can make sure
//! its primary database file exists and tell us where it lives.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::errors::{MigrationError, MigrationResult};

/// Key-value table the storage engine reads and writes.
pub const KV_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS catalystLocalStorage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Hook into the storage engine, called once before the primary copy.
pub trait StorageInitializer {
    /// Create the target database (and its parent directory) if missing.
    /// Returns the path the engine reads from.
    fn ensure_initialized(&self) -> MigrationResult<PathBuf>;
}

impl<F> StorageInitializer for F
where
    F: Fn() -> MigrationResult<PathBuf>,
{
    fn ensure_initialized(&self) -> MigrationResult<PathBuf> {
        self()
    }
}

/// Initializes the target as a SQLite database holding the key-value table.
#[derive(Debug, Clone)]
pub struct SqliteStorageInitializer {
    db_path: PathBuf,
}

impl SqliteStorageInitializer {
    pub fn new(storage_dir: &Path, file_name: &str) -> Self {
        Self {
            db_path: storage_dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl StorageInitializer for SqliteStorageInitializer {
    fn ensure_initialized(&self) -> MigrationResult<PathBuf> {
        let parent = self
            .db_path
            .parent()
            .ok_or_else(|| MigrationError::Initialization {
                message: format!("{} has no parent directory", self.db_path.display()),
            })?;
        std::fs::create_dir_all(parent)?;

        // Default rollback journal: the connection leaves no -wal/-shm behind.
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(KV_SCHEMA_SQL)?;
        drop(conn);

        debug!(path = %self.db_path.display(), "Target storage initialized");
        Ok(self.db_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_database_with_kv_table() {
        let tmp = tempfile::tempdir().unwrap();
        let init = SqliteStorageInitializer::new(&tmp.path().join("databases"), "RKStorage");

        let path = init.ensure_initialized().unwrap();
        assert_eq!(path, tmp.path().join("databases").join("RKStorage"));
        assert!(path.is_file());

        let conn = Connection::open(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM catalystLocalStorage", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn initialization_is_idempotent_and_leaves_no_sidecars() {
        let tmp = tempfile::tempdir().unwrap();
        let init = SqliteStorageInitializer::new(tmp.path(), "RKStorage");
        init.ensure_initialized().unwrap();
        init.ensure_initialized().unwrap();

        assert!(!tmp.path().join("RKStorage-wal").exists());
        assert!(!tmp.path().join("RKStorage-shm").exists());
        assert!(!tmp.path().join("RKStorage-journal").exists());
    }

    #[test]
    fn closures_act_as_initializers() {
        let hook = || -> MigrationResult<PathBuf> { Ok(PathBuf::from("/tmp/target")) };
        assert_eq!(hook.ensure_initialized().unwrap(), PathBuf::from("/tmp/target"));
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::rusqlite::{params, OpenFlags, OptionalExtension};
use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::StorageError;
use crate::storage::store::BackingStore;

/// SQLite-backed persistent store. One database file holds one area.
///
/// Rows carry an autoincrement id; upserts keep it, so ordering by id yields
/// insertion order.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens the database file at `path`, creating it (and missing parent
    /// directories) when needed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_URI)
            .with_init(|c| {
                c.busy_timeout(Duration::from_millis(500))?;
                c.execute_batch(
                    "PRAGMA journal_mode=WAL;
                    CREATE TABLE IF NOT EXISTS web_storage (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        key TEXT NOT NULL UNIQUE,
                        value TEXT NOT NULL
                    );"
                )?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(4)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        // Surface open/schema failures now rather than on first use.
        drop(pool.get()?);
        log::debug!("opened web storage database {}", path.display());

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        Ok(self.pool.get()?)
    }
}

impl BackingStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM web_storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO web_storage(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM web_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM web_storage", [])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM web_storage ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let keys = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, StorageError> {
        let Ok(offset) = i64::try_from(index) else {
            return Ok(None);
        };
        let conn = self.conn()?;
        let key = conn
            .query_row(
                "SELECT key FROM web_storage ORDER BY id LIMIT 1 OFFSET ?1",
                params![offset],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(key)
    }

    fn entries(&self) -> Result<IndexMap<String, String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM web_storage ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        let entries = rows.collect::<Result<IndexMap<_, _>, _>>()?;
        Ok(entries)
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM web_storage", [], |row| row.get::<_, i64>(0))?;
        Ok(count as usize)
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

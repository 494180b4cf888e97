//! SQLite store tracking downloaded images and fetch state.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::Result;

/// Status-table key for the last successful fetch timestamp.
const LAST_FETCH_KEY: &str = "last_successful_fetch";

/// Initialise the fetcher schema in `conn` (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS images (
            id            INTEGER PRIMARY KEY,
            hash          TEXT    NOT NULL UNIQUE,
            filename      TEXT    NOT NULL,
            url           TEXT    NOT NULL,
            downloaded_at TEXT    NOT NULL    -- RFC 3339 UTC
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_images_hash ON images (hash);

        -- Fetch-state key/value pairs.
        CREATE TABLE IF NOT EXISTS status (
            key   TEXT NOT NULL PRIMARY KEY,
            value TEXT NOT NULL
        ) STRICT;
        ",
    )?;
    Ok(())
}

/// Dedup index and retention ledger for downloaded images.
pub struct ImageStore {
    conn: Connection,
}

impl ImageStore {
    /// Open (and initialise) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn is_downloaded(&self, hash: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM images WHERE hash = ?1", params![hash], |_| {
                Ok(())
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count(&self) -> Result<u32> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Drop the `n` oldest rows, returning their filenames so the caller can
    /// remove the files from disk as well.
    pub fn remove_oldest(&self, n: u32) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT filename FROM images ORDER BY downloaded_at ASC, id ASC LIMIT ?1",
        )?;
        let filenames: Vec<String> = stmt
            .query_map(params![n], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;

        self.conn.execute(
            "DELETE FROM images WHERE id IN (
                 SELECT id FROM images ORDER BY downloaded_at ASC, id ASC LIMIT ?1
             )",
            params![n],
        )?;
        debug!(count = filenames.len(), "evicted oldest images");
        Ok(filenames)
    }

    pub fn add_image(
        &self,
        hash: &str,
        filename: &str,
        url: &str,
        downloaded_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO images (hash, filename, url, downloaded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![hash, filename, url, downloaded_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn last_successful_fetch(&self) -> Result<Option<DateTime<Utc>>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM status WHERE key = ?1",
                params![LAST_FETCH_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|v| {
            DateTime::parse_from_rfc3339(&v)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }))
    }

    pub fn set_last_successful_fetch(&self, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO status (key, value) VALUES (?1, ?2)",
            params![LAST_FETCH_KEY, at.to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn added_image_is_downloaded() {
        let store = ImageStore::open_in_memory().unwrap();
        assert!(!store.is_downloaded("abc").unwrap());
        store
            .add_image("abc", "abc.jpg", "https://cdn/abc.jpg", ts(0))
            .unwrap();
        assert!(store.is_downloaded("abc").unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn duplicate_hash_is_rejected() {
        let store = ImageStore::open_in_memory().unwrap();
        store
            .add_image("abc", "abc.jpg", "https://cdn/abc.jpg", ts(0))
            .unwrap();
        assert!(store
            .add_image("abc", "other.jpg", "https://cdn/other.jpg", ts(1))
            .is_err());
    }

    #[test]
    fn eviction_is_oldest_first() {
        let store = ImageStore::open_in_memory().unwrap();
        store.add_image("a", "a.jpg", "u/a", ts(1)).unwrap();
        store.add_image("b", "b.jpg", "u/b", ts(0)).unwrap();
        store.add_image("c", "c.jpg", "u/c", ts(2)).unwrap();

        let evicted = store.remove_oldest(2).unwrap();
        assert_eq!(evicted, vec!["b.jpg".to_string(), "a.jpg".to_string()]);
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.is_downloaded("c").unwrap());
    }

    #[test]
    fn evicting_more_than_stored_empties_the_table() {
        let store = ImageStore::open_in_memory().unwrap();
        store.add_image("a", "a.jpg", "u/a", ts(0)).unwrap();
        let evicted = store.remove_oldest(10).unwrap();
        assert_eq!(evicted.len(), 1);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn last_fetch_roundtrips() {
        let store = ImageStore::open_in_memory().unwrap();
        assert!(store.last_successful_fetch().unwrap().is_none());

        let at = ts(12);
        store.set_last_successful_fetch(at).unwrap();
        assert_eq!(store.last_successful_fetch().unwrap(), Some(at));

        // Overwrite wins.
        let later = ts(13);
        store.set_last_successful_fetch(later).unwrap();
        assert_eq!(store.last_successful_fetch().unwrap(), Some(later));
    }

    #[test]
    fn init_db_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();
    }
}

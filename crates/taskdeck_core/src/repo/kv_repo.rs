//! Key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Provide opaque get/set/remove of string-keyed JSON blobs.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Each key is written as one whole value; there are no cross-key
//!   transactions.
//! - Values are stored verbatim; decoding is the caller's concern.

use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type KvResult<T> = Result<T, KvError>;

/// Storage transport error.
#[derive(Debug)]
pub enum KvError {
    /// SQLite call failed.
    Sqlite(rusqlite::Error),
    /// Database was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// `kv_entries` exists but does not have the expected columns.
    SchemaMismatch(String),
    /// Backend cannot serve requests right now.
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "storage schema version {found} is newer than supported {supported}"
            ),
            Self::SchemaMismatch(message) => write!(f, "unexpected storage schema: {message}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::SchemaMismatch(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Persistent key-value contract consumed by the stores.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
    /// Deletes `key`. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> KvResult<()>;
}

/// SQLite-backed key-value store for device storage.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens the database file at `path`, upgrading its schema when needed.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> KvResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a connection obtained from `db::open_db`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> KvResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: BTreeMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one entry, for fixtures.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKvStore, SqliteKvStore};

    #[test]
    fn memory_store_set_get_remove() {
        let mut kv = MemoryKvStore::new();
        assert_eq!(kv.get("tasks").unwrap(), None);

        kv.set("tasks", "[]").unwrap();
        assert_eq!(kv.get("tasks").unwrap().as_deref(), Some("[]"));

        kv.remove("tasks").unwrap();
        kv.remove("tasks").unwrap();
        assert!(kv.is_empty());
    }

    #[test]
    fn sqlite_store_overwrites_existing_key() {
        let mut kv = SqliteKvStore::open_in_memory().unwrap();
        kv.set("appSettings", r#"{"theme":"dark"}"#).unwrap();
        kv.set("appSettings", r#"{"theme":"light"}"#).unwrap();

        assert_eq!(
            kv.get("appSettings").unwrap().as_deref(),
            Some(r#"{"theme":"light"}"#)
        );
        assert_eq!(kv.keys().unwrap(), vec!["appSettings".to_string()]);
    }
}

//! Profile storage: the durable key-value store shared by every view.
//!
//! One `SQLite` file per profile holds a single table:
//!
//! ```text
//! <root>/profile.sqlite
//!   kv(key TEXT PRIMARY KEY, value TEXT NOT NULL)
//! ```
//!
//! Each open [`Storage`] owns its own connection, so several views (threads or
//! processes) can share one profile. `SQLite` serializes their commits; the last
//! commit for a key wins.

use std::{fs, io, path::PathBuf};

use rusqlite::{Connection, OptionalExtension};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// A connection to the profile's key-value store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (creating if needed) the profile store under `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("profile.sqlite"))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Returns the default storage root: `<data dir>/rolls/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("rolls"))
    }

    /// Reads the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Replaces the value stored under `key` in a single commit.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// A counter that changes whenever another connection commits.
    ///
    /// Commits made through this connection leave it untouched, so a
    /// changed value always means someone else wrote.
    pub fn data_version(&self) -> Result<i64> {
        let version = self
            .conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(version)
    }
}

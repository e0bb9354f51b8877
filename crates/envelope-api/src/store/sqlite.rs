//! [`SqliteStore`]: durable record store backed by a SQLite file.
//!
//! Payload and key material live in separate tables joined one-to-one:
//!
//! ```text
//! users(id, encrypted_data)
//! user_keys(id, user_id -> users.id UNIQUE, encrypted_key, iv)
//! ```

use std::path::Path;

use envelope::EncodedRecord;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::{RecordStore, StoreError};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        encrypted_data TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS user_keys (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        encrypted_key TEXT NOT NULL,
        iv TEXT NOT NULL
    );
";

/// SQLite-backed store. A single connection is shared behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the file cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl RecordStore for SqliteStore {
    fn insert(&self, record: &EncodedRecord) -> Result<i64, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO users (encrypted_data) VALUES (?1)",
            params![record.ciphertext],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO user_keys (user_id, encrypted_key, iv) VALUES (?1, ?2, ?3)",
            params![id, record.wrapped_key, record.data_iv],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<EncodedRecord>, StoreError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                "SELECT u.encrypted_data, k.encrypted_key, k.iv
                 FROM users u JOIN user_keys k ON k.user_id = u.id
                 WHERE u.id = ?1",
                params![id],
                |row| {
                    Ok(EncodedRecord {
                        ciphertext: row.get(0)?,
                        wrapped_key: row.get(1)?,
                        data_iv: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

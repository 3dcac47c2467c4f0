//! SQLite connection handling.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, Result as SqliteResult};

use super::migrations::{self, MigrationError};

/// Shared handle to the embedded SQLite database.
///
/// A single connection behind a mutex; every operation is one short
/// synchronous statement, and SQLite serializes writers anyway.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and bring its
    /// schema up to date. A migration failure here must abort startup.
    pub fn new(path: &str) -> Result<Self, MigrationError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).ok();
            }
        }

        let mut conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // The schema's `FOREIGN KEY (user_id) REFERENCES user(id)` is
        // informational: the `user` table lives in the auth service in front
        // of this backend and is never present here. The design relies on
        // SQLite leaving foreign-key enforcement off; this build's SQLite
        // defaults it on, so disable it explicitly to match intended behavior.
        conn.pragma_update(None, "foreign_keys", "OFF")?;

        migrations::run(&mut conn, migrations::MIGRATIONS)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Flush the WAL into the main database file. Called on shutdown.
    pub fn checkpoint(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
    }
}

//! Versioned schema migrations.
//!
//! Each entry runs at most once per database file; applied versions are
//! recorded in `_migrations`. A migration's DDL and its version row commit
//! in the same transaction, so a failed migration leaves no trace.

use std::collections::HashSet;

use rusqlite::Connection;
use thiserror::Error;

/// A single versioned schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub sql: &'static str,
}

/// Schema history, ascending by version. Append new entries; never edit or
/// reorder released ones.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "
        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content_json TEXT NOT NULL,
            is_public INTEGER NOT NULL DEFAULT 0,
            public_slug TEXT UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES user(id)
        );
        CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id);
        CREATE INDEX IF NOT EXISTS idx_notes_public_slug ON notes(public_slug);
        CREATE INDEX IF NOT EXISTS idx_notes_is_public ON notes(is_public);
    ",
}];

#[derive(Debug, Error)]
pub enum MigrationError {
    /// A specific migration's statements failed and were rolled back.
    #[error("migration {version} failed: {source}")]
    Failed {
        version: i64,
        #[source]
        source: rusqlite::Error,
    },
    /// The migration bookkeeping itself could not be read or written.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

/// Apply every entry of `migrations` whose version is not yet recorded in
/// `_migrations`, in ascending order.
///
/// Safe to call on every startup: already-applied versions are skipped
/// without opening a transaction, and a fully up-to-date database is left
/// untouched.
pub fn run(conn: &mut Connection, migrations: &[Migration]) -> Result<(), MigrationError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let applied: HashSet<i64> = {
        let mut stmt = conn.prepare("SELECT version FROM _migrations")?;
        let versions = stmt.query_map([], |row| row.get(0))?;
        versions.collect::<Result<_, _>>()?
    };

    for migration in migrations {
        if applied.contains(&migration.version) {
            continue;
        }

        let tx = conn.transaction()?;
        let result = tx.execute_batch(migration.sql).and_then(|_| {
            tx.execute(
                "INSERT INTO _migrations (version) VALUES (?1)",
                rusqlite::params![migration.version],
            )?;
            Ok(())
        });

        // Dropping an uncommitted transaction rolls it back.
        match result {
            Ok(()) => tx.commit().map_err(|source| MigrationError::Failed {
                version: migration.version,
                source,
            })?,
            Err(source) => {
                return Err(MigrationError::Failed {
                    version: migration.version,
                    source,
                });
            }
        }
    }

    Ok(())
}

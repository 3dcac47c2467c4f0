//! Note database operations

use chrono::{DateTime, Utc};
use nanoid::nanoid;
use rusqlite::{OptionalExtension, Result as SqliteResult};
use uuid::Uuid;

use super::super::Database;
use crate::models::{DEFAULT_CONTENT_JSON, DEFAULT_TITLE, Note, NoteRow};

/// Length of generated public slugs.
const PUBLIC_SLUG_LEN: usize = 16;

impl Database {
    /// Create a note for `user_id`, applying defaults for missing fields.
    pub fn create_note(
        &self,
        user_id: &str,
        title: Option<&str>,
        content_json: Option<&str>,
    ) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let title = title.unwrap_or(DEFAULT_TITLE);
        let content_json = content_json.unwrap_or(DEFAULT_CONTENT_JSON);
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, user_id, title, content_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                id,
                user_id,
                title,
                content_json,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Note {
            id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            content_json: content_json.to_string(),
            is_public: false,
            public_slug: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch a note by id, scoped to its owner. A note belonging to another
    /// user is indistinguishable from a missing one.
    pub fn get_note_by_id(&self, user_id: &str, note_id: &str) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content_json, is_public, public_slug, created_at, updated_at
             FROM notes WHERE id = ?1 AND user_id = ?2",
        )?;

        stmt.query_row([note_id, user_id], |row| Self::row_to_note(row))
            .optional()
    }

    /// All of a user's notes, most recently modified first.
    pub fn list_notes_by_user(&self, user_id: &str) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content_json, is_public, public_slug, created_at, updated_at
             FROM notes WHERE user_id = ?1 ORDER BY updated_at DESC",
        )?;

        let notes = stmt
            .query_map([user_id], |row| Self::row_to_note(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(notes)
    }

    /// Merge `title`/`content_json` into an owned note. Fields passed as
    /// None are left unchanged; `updated_at` is refreshed either way.
    pub fn update_note(
        &self,
        user_id: &str,
        note_id: &str,
        title: Option<&str>,
        content_json: Option<&str>,
    ) -> SqliteResult<Option<Note>> {
        let existing = match self.get_note_by_id(user_id, note_id)? {
            Some(note) => note,
            None => return Ok(None),
        };

        let title = title.unwrap_or(&existing.title).to_string();
        let content_json = content_json.unwrap_or(&existing.content_json).to_string();
        let now = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE notes SET title = ?1, content_json = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            rusqlite::params![title, content_json, now.to_rfc3339(), note_id, user_id],
        )?;

        Ok(Some(Note {
            title,
            content_json,
            updated_at: now,
            ..existing
        }))
    }

    /// Delete an owned note. Returns whether a row was actually removed;
    /// someone else's note id yields false, not an error.
    pub fn delete_note(&self, user_id: &str, note_id: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            [note_id, user_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Toggle public sharing on an owned note.
    ///
    /// Enabling keeps an existing slug (re-enable preserves the shared URL)
    /// and otherwise mints a fresh one. Disabling always clears the slug, so
    /// a later re-share gets a new URL and old links stay dead.
    pub fn set_note_public(
        &self,
        user_id: &str,
        note_id: &str,
        is_public: bool,
    ) -> SqliteResult<Option<Note>> {
        let existing = match self.get_note_by_id(user_id, note_id)? {
            Some(note) => note,
            None => return Ok(None),
        };

        let public_slug = if is_public {
            Some(
                existing
                    .public_slug
                    .clone()
                    .unwrap_or_else(|| nanoid!(PUBLIC_SLUG_LEN)),
            )
        } else {
            None
        };
        let now = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE notes SET is_public = ?1, public_slug = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            rusqlite::params![is_public, public_slug, now.to_rfc3339(), note_id, user_id],
        )?;

        Ok(Some(Note {
            is_public,
            public_slug,
            updated_at: now,
            ..existing
        }))
    }

    /// Anonymous lookup by slug. Only matches notes that are currently
    /// public, so a stale slug from before an unshare finds nothing.
    pub fn get_note_by_public_slug(&self, slug: &str) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content_json, is_public, public_slug, created_at, updated_at
             FROM notes WHERE public_slug = ?1 AND is_public = 1",
        )?;

        stmt.query_row([slug], |row| Self::row_to_note(row))
            .optional()
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        let note_row = NoteRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            content_json: row.get(3)?,
            is_public: row.get(4)?,
            public_slug: row.get(5)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .unwrap()
                .with_timezone(&Utc),
        };

        Ok(note_row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::tempdir;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).expect("Failed to initialize database");
        (dir, db)
    }

    #[test]
    fn create_applies_defaults_and_scopes_reads_by_owner() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        assert_eq!(note.title, DEFAULT_TITLE);
        assert_eq!(note.content_json, DEFAULT_CONTENT_JSON);
        assert!(!note.is_public);
        assert_eq!(note.public_slug, None);
        assert!(!note.id.is_empty());
        assert_eq!(note.created_at, note.updated_at);

        let fetched = db.get_note_by_id("u1", &note.id).unwrap();
        assert_eq!(fetched, Some(note.clone()));

        // Another user's lookup must look exactly like a missing note.
        assert_eq!(db.get_note_by_id("u2", &note.id).unwrap(), None);
    }

    #[test]
    fn create_uses_provided_fields() {
        let (_dir, db) = test_db();

        let note = db
            .create_note("u1", Some("My Title"), Some(r#"{"doc":true}"#))
            .unwrap();
        assert_eq!(note.title, "My Title");
        assert_eq!(note.content_json, r#"{"doc":true}"#);
    }

    #[test]
    fn list_orders_by_most_recently_updated() {
        let (_dir, db) = test_db();

        let a = db.create_note("u1", Some("A"), None).unwrap();
        sleep(Duration::from_millis(5));
        let b = db.create_note("u1", Some("B"), None).unwrap();
        sleep(Duration::from_millis(5));
        db.update_note("u1", &a.id, Some("A2"), None).unwrap();

        let ids: Vec<String> = db
            .list_notes_by_user("u1")
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn list_is_empty_for_a_user_without_notes() {
        let (_dir, db) = test_db();
        assert!(db.list_notes_by_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn update_merges_missing_fields() {
        let (_dir, db) = test_db();

        let note = db
            .create_note("u1", Some("Original"), Some(r#"{"v":1}"#))
            .unwrap();
        let updated = db
            .update_note("u1", &note.id, Some("Renamed"), None)
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content_json, r#"{"v":1}"#);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[test]
    fn empty_update_still_bumps_updated_at() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        sleep(Duration::from_millis(5));
        let updated = db.update_note("u1", &note.id, None, None).unwrap().unwrap();

        assert_eq!(updated.title, note.title);
        assert_eq!(updated.content_json, note.content_json);
        assert!(updated.updated_at > note.updated_at);
    }

    #[test]
    fn update_of_a_foreign_note_is_not_found() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        assert_eq!(db.update_note("u2", &note.id, Some("hijack"), None).unwrap(), None);

        let untouched = db.get_note_by_id("u1", &note.id).unwrap().unwrap();
        assert_eq!(untouched.title, DEFAULT_TITLE);
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        assert!(db.delete_note("u1", &note.id).unwrap());
        assert!(!db.delete_note("u1", &note.id).unwrap());
        assert_eq!(db.get_note_by_id("u1", &note.id).unwrap(), None);
    }

    #[test]
    fn delete_by_another_user_leaves_the_note_in_place() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        assert!(!db.delete_note("u2", &note.id).unwrap());
        assert!(db.get_note_by_id("u1", &note.id).unwrap().is_some());
    }

    #[test]
    fn enabling_sharing_twice_keeps_the_same_slug() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        let first = db.set_note_public("u1", &note.id, true).unwrap().unwrap();
        let second = db.set_note_public("u1", &note.id, true).unwrap().unwrap();

        assert!(first.public_slug.is_some());
        assert_eq!(first.public_slug, second.public_slug);
    }

    #[test]
    fn unsharing_clears_the_slug_and_resharing_rotates_it() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        let shared = db.set_note_public("u1", &note.id, true).unwrap().unwrap();
        let old_slug = shared.public_slug.clone().unwrap();

        let unshared = db.set_note_public("u1", &note.id, false).unwrap().unwrap();
        assert!(!unshared.is_public);
        assert_eq!(unshared.public_slug, None);

        let reshared = db.set_note_public("u1", &note.id, true).unwrap().unwrap();
        let new_slug = reshared.public_slug.unwrap();
        assert_ne!(new_slug, old_slug);

        // The old URL is permanently dead.
        assert_eq!(db.get_note_by_public_slug(&old_slug).unwrap(), None);
        assert!(db.get_note_by_public_slug(&new_slug).unwrap().is_some());
    }

    #[test]
    fn unsharing_repeatedly_is_fine() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        let a = db.set_note_public("u1", &note.id, false).unwrap().unwrap();
        let b = db.set_note_public("u1", &note.id, false).unwrap().unwrap();
        assert_eq!(a.public_slug, None);
        assert_eq!(b.public_slug, None);
    }

    #[test]
    fn sharing_a_foreign_note_is_not_found() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        assert_eq!(db.set_note_public("u2", &note.id, true).unwrap(), None);
    }

    #[test]
    fn public_slug_lookup_only_matches_public_notes() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", Some("Shared"), None).unwrap();
        let shared = db.set_note_public("u1", &note.id, true).unwrap().unwrap();
        let slug = shared.public_slug.unwrap();

        let found = db.get_note_by_public_slug(&slug).unwrap().unwrap();
        assert_eq!(found.id, note.id);
        assert_eq!(found.title, "Shared");

        assert_eq!(db.get_note_by_public_slug("no-such-slug").unwrap(), None);
    }

    #[test]
    fn sharing_bumps_updated_at() {
        let (_dir, db) = test_db();

        let note = db.create_note("u1", None, None).unwrap();
        sleep(Duration::from_millis(5));
        let shared = db.set_note_public("u1", &note.id, true).unwrap().unwrap();
        assert!(shared.updated_at > note.updated_at);
    }
}

//! Note domain model and its storage-row shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title applied when a note is created without one.
pub const DEFAULT_TITLE: &str = "Untitled note";

/// Serialized empty editor document — the content of a brand-new note.
pub const DEFAULT_CONTENT_JSON: &str = r#"{"type":"doc","content":[{"type":"paragraph"}]}"#;

/// A note as the API serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content_json: String,
    pub is_public: bool,
    /// Present exactly when the note is publicly viewable.
    pub public_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note as the `notes` table stores it: snake_case columns and a 0/1
/// integer for the public flag.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content_json: String,
    pub is_public: i64,
    pub public_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            content_json: row.content_json,
            is_public: row.is_public == 1,
            public_slug: row.public_slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Note> for NoteRow {
    fn from(note: Note) -> Self {
        NoteRow {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content_json: note.content_json,
            is_public: if note.is_public { 1 } else { 0 },
            public_slug: note.public_slug,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

//! Domain models shared between the controllers and the database layer.

mod note;

pub use note::{DEFAULT_CONTENT_JSON, DEFAULT_TITLE, Note, NoteRow};

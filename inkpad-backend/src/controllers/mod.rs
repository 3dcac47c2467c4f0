pub mod health;
pub mod notes;
pub mod public_notes;

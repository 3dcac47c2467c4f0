//! Per-table database operations, each module an `impl Database` block.

mod notes;

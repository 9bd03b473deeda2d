//! SQLite bootstrap for the `posts` table.
//!
//! Connections leave this module either fully migrated, with a `posts` table
//! whose columns match what the store statements bind, or not at all.

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory, DEFAULT_STATEMENT_TIMEOUT};

//! Post store contract and its backends.
//!
//! # Responsibility
//! - Define the `PostStore` contract shared by every backend.
//! - Keep write-path preparation (ids, timestamps, rendering) in one place.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Every backend stores through `PostWriter::prepare`.
//! - Every backend lists through `ordering::sort_posts`.

pub mod memory_store;
pub mod ordering;
pub mod post_store;
pub mod sqlite_store;
pub mod writer;

//! Blog post persistence core.
//!
//! One `PostStore` contract, two backends: a durable SQLite table and a
//! transient in-memory map. Both assign identifiers, default publish
//! timestamps, render markdown to HTML at write time and list posts newest
//! first.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;

pub use config::{open_post_store, StoreBackend, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::post::BlogPost;
pub use render::{ContentRenderer, MarkdownRenderer};
pub use repo::memory_store::InMemoryPostStore;
pub use repo::ordering::{compare_posts, sort_posts};
pub use repo::post_store::PostStore;
pub use repo::sqlite_store::SqlitePostStore;
pub use repo::writer::{IdentifierGenerator, PostWriter, UuidGenerator};

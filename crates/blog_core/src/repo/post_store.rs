//! Post store contract.
//!
//! # Responsibility
//! - Declare the four operations every backend offers.
//!
//! # Invariants
//! - A `get` miss is `Ok(None)`, never an error.
//! - Deleting an unknown identifier is `Ok(())`.
//! - Backend corruption surfaces as `Err`, never as fabricated data.

pub use crate::error::{StoreError, StoreResult};

use crate::model::post::BlogPost;

/// Persistence contract for blog posts.
///
/// Backends are chosen at startup (see `config::open_post_store`) and are
/// interchangeable: the same sequence of calls yields the same observable
/// results on every implementation.
///
/// Every backend can be moved to another thread. Sharing one instance
/// between threads additionally needs `Sync`, which only
/// `InMemoryPostStore` provides; SQLite callers open one store per thread.
pub trait PostStore: Send {
    /// Creates or replaces a post and returns its identifier.
    ///
    /// `post` is a template: a blank identifier is generated, an unset
    /// publish timestamp becomes "now", and both HTML fields are re-rendered
    /// from markdown. The caller's value is never modified.
    fn store(&self, post: &BlogPost) -> StoreResult<String>;

    /// Removes the post with `identifier`, if any.
    fn delete(&self, identifier: &str) -> StoreResult<()>;

    /// Returns an owned copy of the post with `identifier`.
    fn get(&self, identifier: &str) -> StoreResult<Option<BlogPost>>;

    /// Returns owned copies of every post, newest publish timestamp first.
    fn get_all(&self) -> StoreResult<Vec<BlogPost>>;
}

//! Transient in-memory post store.
//!
//! # Responsibility
//! - Serve the `PostStore` contract from a process-local map.
//!
//! # Invariants
//! - The map is guarded by an `RwLock`; readers never observe a half-written
//!   post.
//! - Callers only ever receive clones of map entries.
//! - Contents are lost when the store is dropped.

use crate::model::post::{is_blank, BlogPost};
use crate::repo::ordering::sort_posts;
use crate::repo::post_store::{PostStore, StoreError, StoreResult};
use crate::repo::writer::PostWriter;
use log::debug;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "memory";

/// Map-backed store safe to share across threads.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<String, BlogPost>>,
    writer: PostWriter,
}

impl InMemoryPostStore {
    /// Creates an empty store using markdown rendering and UUID identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with custom write-path collaborators.
    pub fn with_writer(writer: PostWriter) -> Self {
        Self {
            posts: RwLock::default(),
            writer,
        }
    }

    /// Number of stored posts.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, BlogPost>>> {
        self.posts
            .read()
            .map_err(|_| StoreError::LockPoisoned(BACKEND))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, BlogPost>>> {
        self.posts
            .write()
            .map_err(|_| StoreError::LockPoisoned(BACKEND))
    }
}

impl PostStore for InMemoryPostStore {
    fn store(&self, post: &BlogPost) -> StoreResult<String> {
        // Rendering happens outside the lock.
        let prepared = self.writer.prepare(post);
        let identifier = prepared.identifier.clone();
        let replaced = self.write()?.insert(identifier.clone(), prepared).is_some();

        debug!(
            "event=post_store module=repo backend={BACKEND} status=ok identifier={identifier} replaced={replaced}"
        );
        Ok(identifier)
    }

    fn delete(&self, identifier: &str) -> StoreResult<()> {
        if is_blank(identifier) {
            return Ok(());
        }

        let removed = self.write()?.remove(identifier).is_some();
        debug!(
            "event=post_delete module=repo backend={BACKEND} status=ok identifier={identifier} removed={removed}"
        );
        Ok(())
    }

    fn get(&self, identifier: &str) -> StoreResult<Option<BlogPost>> {
        if is_blank(identifier) {
            return Ok(None);
        }

        Ok(self.read()?.get(identifier).cloned())
    }

    fn get_all(&self) -> StoreResult<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> = self.read()?.values().cloned().collect();
        sort_posts(&mut posts);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryPostStore;
    use crate::model::post::BlogPost;
    use crate::repo::post_store::PostStore;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn len_tracks_upserts_and_deletes() {
        let store = InMemoryPostStore::new();
        assert!(store.is_empty().unwrap());

        let id = store.store(&BlogPost::new("a", "b")).unwrap();
        store.store(&BlogPost::with_id(id.as_str(), "a2", "b2")).unwrap();
        assert_eq!(store.len().unwrap(), 1);

        store.delete(&id).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn concurrent_writers_and_readers_keep_map_consistent() {
        let store = Arc::new(InMemoryPostStore::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for round in 0..25 {
                        let identifier = format!("w{worker}-{round}");
                        let post = BlogPost::with_id(identifier.as_str(), "t", "*b*");
                        store.store(&post).unwrap();
                        let loaded = store.get(&identifier).unwrap().unwrap();
                        assert_eq!(loaded.body_html, "<p><em>b</em></p>\n");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len().unwrap(), 200);
    }
}

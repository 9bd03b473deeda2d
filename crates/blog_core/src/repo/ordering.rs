//! Listing order shared by every backend.
//!
//! Posts sort by `publish_timestamp` descending. Equal timestamps fall back
//! to `identifier` ascending (byte-wise), which makes the order total.

use crate::model::post::BlogPost;
use std::cmp::Ordering;

/// Compares two posts in listing order.
pub fn compare_posts(left: &BlogPost, right: &BlogPost) -> Ordering {
    right
        .publish_timestamp
        .cmp(&left.publish_timestamp)
        .then_with(|| left.identifier.cmp(&right.identifier))
}

/// Sorts `posts` into listing order.
pub fn sort_posts(posts: &mut [BlogPost]) {
    posts.sort_by(compare_posts);
}

//! Domain model for blog posts.
//!
//! # Responsibility
//! - Define the single persisted entity shared by every store backend.
//!
//! # Invariants
//! - A stored post always carries a non-blank identifier and a non-zero
//!   publish timestamp.
//! - HTML fields are derived data; markdown fields are the source of truth.

pub mod post;

//! Blog post entity.
//!
//! # Responsibility
//! - Carry the author-supplied markdown plus the HTML derived from it.
//! - Expose the "unsaved" / "unset" sentinels used by the store write path.
//!
//! # Invariants
//! - An empty `identifier` marks a post that has never been stored.
//! - `publish_timestamp == 0` means "publish now" at store time.
//! - `pull_quote_html`/`body_html` are overwritten on every store call and
//!   are ignored as input.

use serde::{Deserialize, Serialize};

/// Sentinel for a publish timestamp the store should default to "now".
pub const UNSET_PUBLISH_TIMESTAMP: i64 = 0;

/// One short-form blog post.
///
/// Serialized with camelCase field names so outer layers can hand the value
/// straight to JSON clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Store-assigned unique key; empty until the first `store`.
    pub identifier: String,
    pub title: String,
    /// Unix epoch milliseconds; `0` means unset.
    pub publish_timestamp: i64,
    pub author: String,
    pub author_email: String,
    /// Markdown source of the pull quote.
    pub pull_quote_markdown: String,
    /// Markdown source of the post body.
    pub body_markdown: String,
    /// Rendered pull quote; empty when the markdown is blank.
    pub pull_quote_html: String,
    /// Rendered body; empty when the markdown is blank.
    pub body_html: String,
}

impl BlogPost {
    /// Creates an unsaved draft with a title and markdown body.
    ///
    /// The identifier stays empty and the publish timestamp unset, so the
    /// first `store` assigns both.
    pub fn new(title: impl Into<String>, body_markdown: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_markdown: body_markdown.into(),
            ..Self::default()
        }
    }

    /// Creates a post addressed at a caller-chosen identifier.
    ///
    /// Storing it overwrites any existing post with the same identifier.
    pub fn with_id(
        identifier: impl Into<String>,
        title: impl Into<String>,
        body_markdown: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::new(title, body_markdown)
        }
    }

    /// Returns whether the store must generate an identifier for this post.
    pub fn is_unsaved(&self) -> bool {
        is_blank(&self.identifier)
    }

    /// Returns whether the store must default the publish timestamp.
    pub fn has_unset_publish_timestamp(&self) -> bool {
        self.publish_timestamp == UNSET_PUBLISH_TIMESTAMP
    }
}

/// Returns whether `value` is empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{is_blank, BlogPost};

    #[test]
    fn blank_covers_empty_and_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn whitespace_identifier_counts_as_unsaved() {
        let post = BlogPost::with_id("   ", "title", "body");
        assert!(post.is_unsaved());
    }
}

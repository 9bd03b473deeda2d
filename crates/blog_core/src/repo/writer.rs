//! Write-path preparation shared by every backend.
//!
//! # Responsibility
//! - Turn a caller template into the fully populated post a backend persists.
//! - Own the identifier and renderer collaborators.
//!
//! # Invariants
//! - The identifier generator runs only for unsaved templates.
//! - The renderer runs once per non-blank markdown field, never on blank input.
//! - The prepared post never carries a zero publish timestamp.

use crate::model::post::BlogPost;
use crate::render::{render_or_empty, ContentRenderer, MarkdownRenderer};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Produces unique string keys for new posts.
pub trait IdentifierGenerator: Send + Sync {
    fn new_identifier(&self) -> String;
}

/// Random v4 UUIDs in hyphenated lowercase form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdentifierGenerator for UuidGenerator {
    fn new_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Collaborators applied to every stored post.
pub struct PostWriter {
    renderer: Box<dyn ContentRenderer>,
    ids: Box<dyn IdentifierGenerator>,
}

impl PostWriter {
    pub fn new(
        renderer: impl ContentRenderer + 'static,
        ids: impl IdentifierGenerator + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            ids: Box::new(ids),
        }
    }

    /// Builds the post to persist from a caller template.
    ///
    /// The template is only read; generated values land on the returned copy.
    pub fn prepare(&self, template: &BlogPost) -> BlogPost {
        let identifier = if template.is_unsaved() {
            self.ids.new_identifier()
        } else {
            template.identifier.clone()
        };
        let publish_timestamp = if template.has_unset_publish_timestamp() {
            now_epoch_ms()
        } else {
            template.publish_timestamp
        };

        BlogPost {
            identifier,
            title: template.title.clone(),
            publish_timestamp,
            author: template.author.clone(),
            author_email: template.author_email.clone(),
            pull_quote_markdown: template.pull_quote_markdown.clone(),
            body_markdown: template.body_markdown.clone(),
            pull_quote_html: render_or_empty(
                self.renderer.as_ref(),
                &template.pull_quote_markdown,
            ),
            body_html: render_or_empty(self.renderer.as_ref(), &template.body_markdown),
        }
    }
}

impl Default for PostWriter {
    fn default() -> Self {
        Self::new(MarkdownRenderer::new(), UuidGenerator)
    }
}

/// Current wall-clock time in Unix epoch milliseconds, never `0`.
pub fn now_epoch_ms() -> i64 {
    let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(_) => 0,
    };
    // 0 is the "unset" sentinel.
    millis.max(1)
}

#[cfg(test)]
mod tests {
    use super::{now_epoch_ms, IdentifierGenerator, PostWriter, UuidGenerator};
    use crate::model::post::BlogPost;
    use crate::render::ContentRenderer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Tagged(Arc<AtomicUsize>);

    impl ContentRenderer for Tagged {
        fn render(&self, markdown: &str) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            format!("<r>{markdown}</r>")
        }
    }

    struct Fixed;

    impl IdentifierGenerator for Fixed {
        fn new_identifier(&self) -> String {
            "generated".to_string()
        }
    }

    #[test]
    fn prepare_fills_generated_fields_without_touching_template() {
        let calls = Arc::new(AtomicUsize::new(0));
        let writer = PostWriter::new(Tagged(Arc::clone(&calls)), Fixed);
        let mut template = BlogPost::new("title", "body");
        template.pull_quote_markdown = "quote".to_string();
        let before = template.clone();

        let prepared = writer.prepare(&template);

        assert_eq!(template, before);
        assert_eq!(prepared.identifier, "generated");
        assert!(prepared.publish_timestamp > 0);
        assert_eq!(prepared.body_html, "<r>body</r>");
        assert_eq!(prepared.pull_quote_html, "<r>quote</r>");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn prepare_keeps_supplied_identifier_and_timestamp() {
        let writer = PostWriter::new(Tagged(Arc::new(AtomicUsize::new(0))), Fixed);
        let mut template = BlogPost::with_id("mine", "title", "");
        template.publish_timestamp = 42;
        template.body_html = "stale".to_string();

        let prepared = writer.prepare(&template);

        assert_eq!(prepared.identifier, "mine");
        assert_eq!(prepared.publish_timestamp, 42);
        assert_eq!(prepared.body_html, "");
    }

    #[test]
    fn uuid_generator_yields_distinct_values() {
        let first = UuidGenerator.new_identifier();
        let second = UuidGenerator.new_identifier();
        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn now_is_never_the_unset_sentinel() {
        assert!(now_epoch_ms() > 0);
    }
}

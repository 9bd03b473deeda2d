//! Markdown-to-HTML rendering used on the store write path.
//!
//! # Responsibility
//! - Define the `ContentRenderer` seam the stores call at write time.
//! - Provide the default pulldown-cmark based renderer.
//!
//! # Invariants
//! - Rendering is pure: same input, same output, no side effects.
//! - Blank input never reaches a renderer (see `render_or_empty`).

mod markdown;

pub use markdown::MarkdownRenderer;

use crate::model::post::is_blank;

/// Converts markdown source text into HTML markup.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Renders `markdown`, short-circuiting blank input to an empty string.
pub fn render_or_empty(renderer: &dyn ContentRenderer, markdown: &str) -> String {
    if is_blank(markdown) {
        return String::new();
    }
    renderer.render(markdown)
}

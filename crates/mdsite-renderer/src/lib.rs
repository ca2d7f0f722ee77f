//! Markdown and page template rendering for mdsite.
//!
//! - [`MarkdownRenderer`]: pulldown-cmark HTML output with fenced code
//!   wrapped in the highlight container the section restructurer decorates
//! - [`TemplateRenderer`]: minijinja templates loaded from a directory,
//!   reporting missing templates as [`TemplateError::NotFound`]
//!
//! # Example
//!
//! ```
//! use mdsite_renderer::render_markdown;
//!
//! let html = render_markdown("## Hello\n\n**Bold** text");
//! assert_eq!(html, "<h2>Hello</h2>\n<p><strong>Bold</strong> text</p>\n");
//! ```

mod markdown;
mod template;

pub use markdown::{MarkdownRenderer, render_markdown};
pub use template::{PageVars, TemplateError, TemplateRenderer};

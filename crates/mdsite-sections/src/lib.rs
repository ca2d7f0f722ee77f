//! Section restructuring and table of contents for mdsite.
//!
//! Rendered page HTML is split into collapsible sections, one per level-2
//! heading, and a matching table of contents is produced:
//!
//! - [`slug`]: heading text to element id
//! - [`HtmlNode`]: lightweight element tree built by the `html5ever` HTML5 parser
//! - [`restructure`]: heading normalization, sectioning, TOC and title capture
//!
//! # Example
//!
//! ```
//! use mdsite_sections::restructure;
//!
//! let html = "<h2>Install</h2><p>Run it.</p><h3>Maven Setup</h3><p>Add it.</p>";
//! let result = restructure(html, true);
//!
//! assert_eq!(result.title.as_deref(), Some("Install"));
//! assert!(result.body.contains(r#"<div class="datalist" id="Install">"#));
//! assert!(result.toc.to_html().contains("#Install-Maven-Setup"));
//! ```

mod restructure;
mod slug;
mod toc;
mod tree;

pub use restructure::{COPY_BAR_CLASS, HIGHLIGHT_CLASS, Restructured, restructure};
pub use slug::slug;
pub use toc::{Section, Subsection, Toc};
pub use tree::{HtmlNode, parse_fragment, serialize_fragment};

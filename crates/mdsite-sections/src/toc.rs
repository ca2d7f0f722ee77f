//! Table of contents tree derived from page sections.

use std::fmt::Write;

use crate::tree::escape;

/// A level-3 heading inside a [`Section`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    /// Element id, prefixed by the parent section id.
    pub id: String,
    /// Decoded heading text.
    pub title: String,
}

/// A collapsible page section started by a level-2 heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Element id of the section container.
    pub id: String,
    /// Decoded heading text.
    pub title: String,
    /// Level-3 headings in document order.
    pub subsections: Vec<Subsection>,
}

/// Ordered sections of a page. The first section is the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    pub sections: Vec<Section>,
}

impl Toc {
    /// Whether the page has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render the nested list markup.
    ///
    /// ```text
    /// <ul>
    /// <li class="active">
    /// <a href="#Install">Install</a><ul>
    /// <li>
    /// <a href="#Install-Maven-Setup">Maven Setup</a></li></ul></li>
    /// </ul>
    /// ```
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<ul>");
        for (index, section) in self.sections.iter().enumerate() {
            let class = if index == 0 { r#" class="active""# } else { "" };
            let _ = write!(
                html,
                "\n<li{class}>\n<a href=\"#{}\">{}</a>",
                escape(&section.id),
                escape(&section.title)
            );
            if !section.subsections.is_empty() {
                html.push_str("<ul>");
                for sub in &section.subsections {
                    let _ = write!(
                        html,
                        "\n<li>\n<a href=\"#{}\">{}</a></li>",
                        escape(&sub.id),
                        escape(&sub.title)
                    );
                }
                html.push_str("</ul>");
            }
            html.push_str("</li>");
        }
        html.push_str("\n</ul>");
        html
    }
}

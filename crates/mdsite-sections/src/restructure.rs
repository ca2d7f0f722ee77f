//! Rendered HTML to collapsible sections.
//!
//! Every level-2 heading opens a section that runs until the next level-2
//! heading:
//!
//! ```text
//! <h2>Install</h2>              <div class="datalist" id="Install">
//! <p>...</p>             =>     <div class="datalist-title active">
//! <h3>Maven</h3>                <h2>Install</h2>
//! <p>...</p>                    </div>
//!                               <div class="datalist-content">
//!                               <p>...</p><h3 id="Install-Maven">Maven</h3><p>...</p>
//!                               </div></div>
//! ```
//!
//! Pages other than the site root index first have their headings shifted
//! one level down so that level 2 is reserved for section delimiters.

use crate::slug::slug;
use crate::toc::{Section, Subsection, Toc};
use crate::tree::{HtmlNode, parse_fragment, serialize_fragment};

/// Class of the container the markdown renderer wraps fenced code in.
pub const HIGHLIGHT_CLASS: &str = "highlighter-rouge";

/// Class of the copy-to-clipboard bar prepended to code containers.
pub const COPY_BAR_CLASS: &str = "copy-bar";

/// Result of [`restructure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restructured {
    /// Page body with sections wrapped in collapsible containers.
    pub body: String,
    /// Section tree for the table of contents.
    pub toc: Toc,
    /// Text of the first section heading.
    pub title: Option<String>,
}

/// Restructure rendered page HTML into sections, TOC and title.
///
/// `is_root_index` disables heading normalization for the site's top-level
/// index page.
pub fn restructure(html: &str, is_root_index: bool) -> Restructured {
    let mut root = parse_fragment(html);

    if !is_root_index {
        shift_headings(&mut root);
    }

    let toc = build_sections(&mut root);
    add_copy_bars(&mut root);

    let title = toc.sections.first().map(|section| section.title.clone());
    tracing::debug!(sections = toc.sections.len(), title = ?title, "Restructured page");
    Restructured {
        body: serialize_fragment(&root),
        toc,
        title,
    }
}

/// Shift h1-h4 down one level. Each heading moves at most once.
fn shift_headings(root: &mut HtmlNode) {
    root.walk_mut(&mut |node| {
        let shifted = match node.tag.as_str() {
            "h1" => "h2",
            "h2" => "h3",
            "h3" => "h4",
            "h4" => "h5",
            _ => return,
        };
        shifted.clone_into(&mut node.tag);
    });
}

/// Replace each top-level h2 and its following siblings with a section container.
///
/// Content before the first h2 stays in place.
fn build_sections(root: &mut HtmlNode) -> Toc {
    let mut nodes = std::mem::take(&mut root.children);
    let starts: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_tag("h2"))
        .map(|(index, _)| index)
        .collect();

    // Split spans off the end so every earlier index stays valid.
    let mut spans = Vec::with_capacity(starts.len());
    for &start in starts.iter().rev() {
        spans.push(nodes.split_off(start));
    }
    spans.reverse();

    let mut toc = Toc::default();
    let mut children = nodes;
    for (index, mut span) in spans.into_iter().enumerate() {
        let body = span.split_off(1);
        let heading = span.remove(0);
        let (section, container) = build_section(heading, body, index == 0);
        toc.sections.push(section);
        children.push(container);
    }

    root.children = children;
    toc
}

/// Build one section from its h2 and the sibling nodes that follow it.
fn build_section(heading: HtmlNode, body: Vec<HtmlNode>, active: bool) -> (Section, HtmlNode) {
    let title = heading.text_content();
    let id = slug(&title);

    let mut subsections = Vec::new();
    let body: Vec<HtmlNode> = body
        .into_iter()
        .map(|mut node| {
            if node.is_tag("h3") {
                let sub_title = node.text_content();
                let sub_id = format!("{id}-{}", slug(&sub_title));
                node.set_attr("id", sub_id.clone());
                subsections.push(Subsection {
                    id: sub_id,
                    title: sub_title,
                });
            }
            node
        })
        .collect();

    let title_class = if active {
        "datalist-title active"
    } else {
        "datalist-title"
    };
    let header = HtmlNode::new("div")
        .with_attr("class", title_class)
        .with_text("\n")
        .with_children(vec![heading])
        .with_tail("\n");
    let content = HtmlNode::new("div")
        .with_attr("class", "datalist-content")
        .with_text("\n")
        .with_children(body)
        .with_tail("\n");
    let container = HtmlNode::new("div")
        .with_attr("class", "datalist")
        .with_attr("id", id.clone())
        .with_children(vec![header, content])
        .with_tail("\n");

    let section = Section {
        id,
        title,
        subsections,
    };
    (section, container)
}

/// Prepend the copy bar to every fenced code container.
fn add_copy_bars(root: &mut HtmlNode) {
    root.walk_mut(&mut |node| {
        if node.is_tag("div") && node.has_class(HIGHLIGHT_CLASS) {
            node.prepend_child(copy_bar());
        }
    });
}

fn copy_bar() -> HtmlNode {
    let button = HtmlNode::new("span")
        .with_attr(
            "class",
            "icon-clipboard-big copy-button octicon octicon-clippy",
        )
        .with_attr("title", "copy to clipboard");
    HtmlNode::new("div")
        .with_attr("class", COPY_BAR_CLASS)
        .with_text("\n")
        .with_children(vec![button])
}

//! Lightweight element tree for rendered page HTML.
//!
//! Fragments are parsed with the HTML5 tree builder from `html5ever`, so raw
//! HTML passed through by the markdown renderer is read the way a browser
//! reads it. Text and attribute values are kept decoded; [`serialize_fragment`]
//! escapes them again on output.

use std::rc::Rc;

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Tag of the synthetic wrapper element returned by [`parse_fragment`].
const ROOT_TAG: &str = "root";

/// Pseudo tag marking a comment node. Its text is the comment body.
const COMMENT_TAG: &str = "!--";

/// Document prologue that places the fragment directly in `<body>`.
const BODY_PROLOGUE: &str = "<!DOCTYPE html><html><head></head><body>";

/// HTML elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Node in a parsed HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlNode {
    /// Element tag name as produced by the HTML5 parser.
    pub tag: String,
    /// Attributes in source order, values decoded.
    pub attrs: Vec<(String, String)>,
    /// Text before the first child (decoded).
    pub text: String,
    /// Text after the element's closing tag (decoded).
    pub tail: String,
    /// Child nodes.
    pub children: Vec<HtmlNode>,
}

impl HtmlNode {
    /// Create a new node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create a comment node.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(COMMENT_TAG).with_text(text)
    }

    /// Whether this node is a comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.tag == COMMENT_TAG
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add or replace an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<HtmlNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this element has the given tag name.
    #[must_use]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    /// Whether the `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Decoded text of this element and its descendants.
    ///
    /// Whitespace runs collapse to a single space and the result is trimmed.
    /// The element's own tail is not included.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        if !self.is_comment() {
            out.push_str(&self.text);
        }
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    /// Insert `child` before all existing content of this element.
    pub fn prepend_child(&mut self, mut child: HtmlNode) {
        child.tail.insert_str(0, &std::mem::take(&mut self.text));
        self.children.insert(0, child);
    }

    /// Visit this element and every descendant, depth first.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut HtmlNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// Parse an HTML fragment into a tree under a synthetic root element.
///
/// The fragment is parsed as the content of `<body>` with the HTML5 tree
/// construction rules: unmatched end tags are dropped, open elements are
/// closed implicitly, `script` and `style` bodies are raw text and a bare
/// `&` is literal text. Parsing never fails.
#[must_use]
pub fn parse_fragment(html: &str) -> HtmlNode {
    let input = format!("{BODY_PROLOGUE}{html}");
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(input);

    let mut root = HtmlNode::new(ROOT_TAG);
    if let Some(body) =
        find_element(&dom.document, "html").and_then(|html| find_element(&html, "body"))
    {
        convert_children(&body, &mut root);
    }
    root
}

/// Serialize the content of `root` (its text and children, not the root tag).
pub fn serialize_fragment(root: &HtmlNode) -> String {
    let mut out = String::with_capacity(4096);
    write_content(root, &mut out);
    out
}

/// Escape text for use in element content or a double-quoted attribute.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text, true);
    out
}

fn find_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, NodeData::Element { name, .. } if &*name.local == tag))
        .map(Rc::clone)
}

fn convert_children(parent: &Handle, node: &mut HtmlNode) {
    for child in parent.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => append_text(node, &contents.borrow()),
            NodeData::Comment { contents } => node.children.push(HtmlNode::comment(&**contents)),
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut element = HtmlNode::new(qualified_name(name));
                element.attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (qualified_name(&attr.name), attr.value.to_string()))
                    .collect();
                let content = template_contents
                    .borrow()
                    .as_ref()
                    .map_or_else(|| Rc::clone(child), Rc::clone);
                convert_children(&content, &mut element);
                node.children.push(element);
            }
            NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        }
    }
}

fn qualified_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

/// Append text to the element's text or its last child's tail.
fn append_text(node: &mut HtmlNode, text: &str) {
    match node.children.last_mut() {
        Some(last_child) => last_child.tail.push_str(text),
        None => node.text.push_str(text),
    }
}

fn write_node(node: &HtmlNode, out: &mut String) {
    if node.is_comment() {
        out.push_str("<!--");
        out.push_str(&node.text);
        out.push_str("-->");
        return;
    }

    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        push_escaped(out, value, true);
        out.push('"');
    }

    if is_void(&node.tag) && node.children.is_empty() && node.text.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        write_content(node, out);
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

/// Write the text and children of `node`, each child followed by its tail.
fn write_content(node: &HtmlNode, out: &mut String) {
    let raw = RAW_TEXT_ELEMENTS.contains(&node.tag.as_str());
    let push_text = |out: &mut String, text: &str| {
        if raw {
            out.push_str(text);
        } else {
            push_escaped(out, text, false);
        }
    };

    push_text(out, &node.text);
    for child in &node.children {
        write_node(child, out);
        push_text(out, &child.tail);
    }
}

fn push_escaped(out: &mut String, text: &str, quote: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if quote => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn round_trip(html: &str) -> String {
        serialize_fragment(&parse_fragment(html))
    }

    #[test]
    fn test_parse_simple_element() {
        let tree = parse_fragment("<p>Hello</p>");

        assert_eq!(tree.tag, "root");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].tag, "p");
        assert_eq!(tree.children[0].text, "Hello");
    }

    #[test]
    fn test_parse_nested_elements_with_tail() {
        let tree = parse_fragment("<p><strong>Bold</strong> text</p>");

        let p = &tree.children[0];
        assert!(p.text.is_empty());
        assert_eq!(p.children[0].tag, "strong");
        assert_eq!(p.children[0].text, "Bold");
        assert_eq!(p.children[0].tail, " text");
    }

    #[test]
    fn test_parse_top_level_tails() {
        let tree = parse_fragment("<h2>A</h2>\n<p>x</p>\n");

        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].tail, "\n");
        assert_eq!(tree.children[1].tail, "\n");
    }

    #[test]
    fn test_parse_void_element_without_slash() {
        let tree = parse_fragment("<p>a<br>b</p><p>c</p>");

        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children[0].tag, "br");
        assert_eq!(tree.children[0].children[0].tail, "b");
    }

    #[test]
    fn test_parse_keeps_attribute_order() {
        let tree = parse_fragment(r#"<a href="/x" title="t">x</a>"#);

        assert_eq!(
            tree.children[0].attrs,
            vec![
                ("href".to_owned(), "/x".to_owned()),
                ("title".to_owned(), "t".to_owned())
            ]
        );
    }

    #[test]
    fn test_parse_bare_ampersand_as_text() {
        let tree = parse_fragment(r#"<div align="center">Q & A</div>"#);

        assert_eq!(tree.children[0].text, "Q & A");
        assert_eq!(round_trip("<p>Tom & Jerry</p>"), "<p>Tom &amp; Jerry</p>");
    }

    #[test]
    fn test_parse_script_body_as_raw_text() {
        let html = "<script>\nif (a < b) { go(); }\n</script>\n<h2>Usage</h2>\n";
        let tree = parse_fragment(html);

        assert_eq!(tree.children.len(), 2);
        assert!(tree.children[0].children.is_empty());
        assert_eq!(tree.children[0].text, "\nif (a < b) { go(); }\n");
        assert!(tree.children[1].is_tag("h2"));
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_round_trip_entities() {
        assert_eq!(
            round_trip("<p>a &lt; b &amp;&amp; c &gt; &quot;d&quot;&nbsp;e</p>"),
            "<p>a &lt; b &amp;&amp; c &gt; \"d\"&nbsp;e</p>"
        );
        assert_eq!(
            round_trip(r#"<a title="&quot;x&quot; &amp; y">z</a>"#),
            r#"<a title="&quot;x&quot; &amp; y">z</a>"#
        );
    }

    #[test]
    fn test_round_trip_self_closing() {
        assert_eq!(round_trip("<p>Before<br />After</p>"), "<p>Before<br />After</p>");
        assert_eq!(round_trip("<hr />"), "<hr />");
    }

    #[test]
    fn test_round_trip_empty_non_void_element() {
        assert_eq!(round_trip(r#"<a id="top"></a>"#), r#"<a id="top"></a>"#);
    }

    #[test]
    fn test_round_trip_code_block() {
        let html = "<pre><code class=\"language-java\">if (a &lt; b) {\n  run();\n}\n</code></pre>\n";
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_round_trip_comment() {
        let html = "<p>a</p>\n<!-- note -->\n<p>b</p>";
        let tree = parse_fragment(html);

        assert!(tree.children[1].is_comment());
        assert_eq!(tree.text_content(), "a b");
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_unmatched_end_tag_is_dropped() {
        assert_eq!(round_trip("<p>a</span>b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_text_content_decodes_and_normalizes() {
        let tree = parse_fragment("<h2>  Tom &amp;\n <em>Jerry</em>  </h2>");
        assert_eq!(tree.children[0].text_content(), "Tom & Jerry");
    }

    #[test]
    fn test_text_content_excludes_own_tail() {
        let node = HtmlNode::new("h3").with_text("Title").with_tail(" after");
        assert_eq!(node.text_content(), "Title");
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut node = HtmlNode::new("h3")
            .with_attr("id", "old")
            .with_attr("class", "x");
        node.set_attr("id", "new");

        assert_eq!(
            node.attrs,
            vec![
                ("id".to_owned(), "new".to_owned()),
                ("class".to_owned(), "x".to_owned())
            ]
        );
    }

    #[test]
    fn test_has_class() {
        let node = HtmlNode::new("div").with_attr("class", "highlighter-rouge language-java");
        assert!(node.has_class("highlighter-rouge"));
        assert!(!node.has_class("highlighter"));
    }

    #[test]
    fn test_prepend_child_moves_leading_text() {
        let mut node = HtmlNode::new("div")
            .with_text("\n")
            .with_children(vec![HtmlNode::new("pre")]);
        node.prepend_child(HtmlNode::new("span"));

        let mut out = String::new();
        write_node(&node, &mut out);
        assert_eq!(out, "<div><span></span>\n<pre></pre></div>");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"A & "B" <C>"#), "A &amp; &quot;B&quot; &lt;C&gt;");
    }
}

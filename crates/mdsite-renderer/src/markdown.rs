//! Markdown to HTML conversion.

use std::fmt::Write;

use mdsite_sections::HIGHLIGHT_CLASS;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Markdown renderer producing XHTML-compatible HTML.
///
/// Standard constructs are rendered by pulldown-cmark. Fenced code blocks
/// are wrapped in a highlight container:
///
/// ```text
/// <div class="highlighter-rouge language-java"><pre class="highlight"><code>...</code></pre></div>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, FencedCode::new(parser));
        out
    }
}

/// Render markdown with the default renderer.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}

/// Event adapter replacing fenced code blocks with highlight container markup.
struct FencedCode<'a, I> {
    inner: I,
    _marker: std::marker::PhantomData<&'a ()>,
}

impl<'a, I: Iterator<Item = Event<'a>>> FencedCode<'a, I> {
    fn new(inner: I) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }

    /// Consume events up to the end of the current code block.
    fn collect_code(&mut self) -> String {
        let mut code = String::new();
        for event in self.inner.by_ref() {
            match event {
                Event::Text(text) => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => break,
                _ => {}
            }
        }
        code
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for FencedCode<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().unwrap_or("").to_owned();
                let code = self.collect_code();
                Some(Event::Html(CowStr::from(code_container(&lang, &code))))
            }
            event => Some(event),
        }
    }
}

fn code_container(lang: &str, code: &str) -> String {
    let mut out = String::with_capacity(code.len() + 96);
    if lang.is_empty() {
        let _ = write!(out, r#"<div class="{HIGHLIGHT_CLASS}">"#);
    } else {
        let _ = write!(
            out,
            r#"<div class="{HIGHLIGHT_CLASS} language-{}">"#,
            escape_html(lang)
        );
    }
    let _ = writeln!(
        out,
        r#"<pre class="highlight"><code>{}</code></pre></div>"#,
        escape_html(code)
    );
    out
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

//! Page templates.
//!
//! Templates are minijinja files stored under a templates directory and
//! addressed by their relative path without the `.html` extension, so the
//! template for `doc/jetty/index.md` is `doc/jetty/index` and lives at
//! `<templates>/doc/jetty/index.html`.

use std::path::Path;

use minijinja::{AutoEscape, Environment, ErrorKind, context, path_loader};

/// Template loading and rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template file exists under the given name.
    #[error("Template not found: {0}")]
    NotFound(String),
    /// Template failed to parse or render.
    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Variables exposed to page templates.
///
/// `page_header` is rendered as an empty string when the page has no title.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageVars<'a> {
    /// Page body HTML.
    pub main: &'a str,
    /// Table of contents HTML.
    pub toc: &'a str,
    /// First section title.
    pub page_header: Option<&'a str>,
}

/// Renders pages with templates loaded from a directory.
///
/// Values are inserted verbatim: `main` and `toc` are already HTML.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer reading templates from `dir`.
    ///
    /// Templates are loaded lazily on first use.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir.as_ref()));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }

    /// Render template `name` with the given page variables.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if no template file exists and
    /// [`TemplateError::Render`] if it fails to parse or render.
    pub fn render(&self, name: &str, vars: &PageVars<'_>) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(&file_name(name))
            .map_err(|e| match e.kind() {
                ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_owned()),
                _ => TemplateError::Render {
                    name: name.to_owned(),
                    source: e,
                },
            })?;

        tracing::trace!(template = name, "Rendering page template");
        template
            .render(context! {
                main => vars.main,
                toc => vars.toc,
                page_header => vars.page_header.unwrap_or_default(),
            })
            .map_err(|source| TemplateError::Render {
                name: name.to_owned(),
                source,
            })
    }
}

fn file_name(name: &str) -> String {
    format!("{name}.html")
}

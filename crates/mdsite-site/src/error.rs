//! Site build errors.

use std::path::PathBuf;

use mdsite_corpus::{CorpusError, PagePath};
use mdsite_renderer::TemplateError;

/// Error returned by the site builder.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Neither the page template nor an applicable fallback exists.
    #[error("Template not found: {0}")]
    MissingTemplate(String),
    /// Page discovered but absent from the resolved corpus.
    #[error("Page not found in resolved corpus: {0}")]
    MissingSource(PagePath),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SiteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

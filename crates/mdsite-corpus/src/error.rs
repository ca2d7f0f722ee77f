//! Corpus error types.

use std::path::PathBuf;

/// Error reading or resolving the markdown corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// A discovered page no longer exists.
    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),
    /// Any other filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

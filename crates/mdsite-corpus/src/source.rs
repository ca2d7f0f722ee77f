//! Reading and preprocessing page sources.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::CorpusError;

const FRONT_MATTER_DELIMITER: &str = "---";

/// Read a page, normalizing line endings to `\n` without a trailing newline.
///
/// # Errors
///
/// Returns [`CorpusError::MissingSource`] if the file does not exist and
/// [`CorpusError::Io`] for any other read failure.
pub fn read_source(path: &Path) -> Result<String, CorpusError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(normalize_lines(&text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(CorpusError::MissingSource(path.to_path_buf()))
        }
        Err(e) => Err(CorpusError::io(path, e)),
    }
}

/// Join the lines of `text` with `\n`.
pub(crate) fn normalize_lines(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n")
}

/// Drop a leading front matter block.
///
/// Text starting with `---` loses everything up to and including the next
/// `---`. Without a closing delimiter the text is returned unchanged.
#[must_use]
pub fn strip_front_matter(text: &str) -> &str {
    if !text.starts_with(FRONT_MATTER_DELIMITER) {
        return text;
    }
    match text[1..].find(FRONT_MATTER_DELIMITER) {
        Some(pos) => &text[1 + pos + FRONT_MATTER_DELIMITER.len()..],
        None => text,
    }
}

/// Rewrite of absolute repository links into site-relative links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewrite {
    from: String,
    to: String,
}

impl UrlRewrite {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Replace every occurrence of the source prefix.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if self.from.is_empty() {
            return text.to_owned();
        }
        text.replace(&self.from, &self.to)
    }
}

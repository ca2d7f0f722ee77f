//! Page discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

use mdsite_corpus::PagePath;

use crate::error::SiteError;

/// Discovers markdown pages under a source root.
///
/// Hidden files and directories (leading `.`) are skipped.
pub struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Every `.md` file under the root, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Io`] if the root or a subdirectory cannot be read.
    pub fn scan(&self) -> Result<Vec<PagePath>, SiteError> {
        let mut pages = Vec::new();
        self.scan_directory(&self.source_dir, &mut pages)?;
        pages.sort();
        tracing::debug!(pages = pages.len(), dir = %self.source_dir.display(), "Scanned sources");
        Ok(pages)
    }

    fn scan_directory(&self, dir: &Path, pages: &mut Vec<PagePath>) -> Result<(), SiteError> {
        let entries = fs::read_dir(dir).map_err(|e| SiteError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SiteError::io(dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                self.scan_directory(&path, pages)?;
            } else if name.ends_with(".md") {
                match PagePath::from_fs(&self.source_dir, &path) {
                    Some(page) => pages.push(page),
                    None => tracing::warn!(path = %path.display(), "Skipping non UTF-8 page path"),
                }
            }
        }
        Ok(())
    }
}

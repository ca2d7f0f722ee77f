//! Root-relative page paths.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Path of a markdown page relative to the source root, `/`-separated.
///
/// This is also the variable name under which the page's text can be
/// transcluded, e.g. `{{doc/guide/README.md}}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PagePath(String);

impl PagePath {
    /// Create from a `/`-separated relative path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build from a filesystem path under `root`.
    ///
    /// Returns `None` if `path` is not under `root` or is not valid UTF-8.
    #[must_use]
    pub fn from_fs(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?),
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Name of the directory containing the page, `None` at the root.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        let (parent, _) = self.0.rsplit_once('/')?;
        Some(parent.rsplit('/').next().unwrap_or(parent))
    }

    /// Absolute filesystem path under `root`.
    #[must_use]
    pub fn to_fs(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fs() {
        let page = PagePath::from_fs(Path::new("/src/md"), Path::new("/src/md/doc/jdbc/README.md"));
        assert_eq!(page, Some(PagePath::new("doc/jdbc/README.md")));
    }

    #[test]
    fn test_from_fs_outside_root() {
        assert_eq!(PagePath::from_fs(Path::new("/src/md"), Path::new("/other/a.md")), None);
        assert_eq!(PagePath::from_fs(Path::new("/src/md"), Path::new("/src/md")), None);
    }

    #[test]
    fn test_segments() {
        let page = PagePath::new("doc/jdbc/README.md");
        assert_eq!(page.file_name(), "README.md");
        assert_eq!(page.parent_name(), Some("jdbc"));

        let root = PagePath::new("index.md");
        assert_eq!(root.file_name(), "index.md");
        assert_eq!(root.parent_name(), None);
    }

    #[test]
    fn test_to_fs() {
        let page = PagePath::new("doc/index.md");
        assert_eq!(page.to_fs(Path::new("/md")), PathBuf::from("/md/doc/index.md"));
    }
}

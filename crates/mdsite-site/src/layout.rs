//! Mapping from source pages to output files and templates.

use std::path::{Path, PathBuf};

use mdsite_corpus::PagePath;

const README: &str = "README.md";
const INDEX: &str = "index.md";
const INDEX_HTML: &str = "index.html";

/// Whether `page` produces an output file.
///
/// Pages of interest are `index.md` anywhere and `README.md` below the
/// root. Every other page is only available for transclusion.
#[must_use]
pub fn is_page_of_interest(page: &PagePath) -> bool {
    match page.file_name() {
        INDEX => true,
        README => page.parent_name().is_some(),
        _ => false,
    }
}

/// The site's top-level index keeps its heading levels.
#[must_use]
pub fn is_root_index(page: &PagePath) -> bool {
    page.as_str() == INDEX
}

/// Output file of `page` under `output_dir`.
///
/// `doc/README.md` maps to `doc/index.html`, `quickstart/index.md` to
/// `quickstart/index.html`.
#[must_use]
pub fn output_path(output_dir: &Path, page: &PagePath) -> PathBuf {
    let rel = page.as_str();
    let rel = rel
        .strip_suffix(README)
        .or_else(|| rel.strip_suffix(INDEX))
        .filter(|dir| dir.is_empty() || dir.ends_with('/'))
        .map_or_else(|| rel.to_owned(), |dir| format!("{dir}{INDEX_HTML}"));
    PagePath::new(rel).to_fs(output_dir)
}

/// Template name of `page`: its path without `.md`, `README` read as `index`.
#[must_use]
pub fn template_name(page: &PagePath) -> String {
    let rel = page.as_str();
    let stem = rel.strip_suffix(".md").unwrap_or(rel);
    match stem.strip_suffix("README") {
        Some(dir) if dir.is_empty() || dir.ends_with('/') => format!("{dir}index"),
        _ => stem.to_owned(),
    }
}

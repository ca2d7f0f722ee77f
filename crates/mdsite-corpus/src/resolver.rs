//! Two-pass resolution of `{{name}}` placeholders across the corpus.
//!
//! Pass 1 resolves link shortcuts in every page and records the result as
//! a page variable. Pass 2 resolves every page again against links and
//! pass-1 page texts, so `{{doc/guide/README.md}}` transcludes the guide
//! with its links already resolved. Transclusion is one level deep: a
//! transcluded page's own page placeholders stay literal.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::appendix::AppendixInjector;
use crate::error::CorpusError;
use crate::page::PagePath;
use crate::source::{UrlRewrite, read_source, strip_front_matter};
use crate::variables::{LinkTable, VariableTable, substitute};

/// Token replaced by the page's generated appendix.
pub const APPENDIX_TOKEN: &str = "{{appendix}}";

/// Resolves the markdown corpus under a source root.
#[derive(Debug, Clone)]
pub struct Resolver {
    source_dir: PathBuf,
    links: LinkTable,
    appendix: AppendixInjector,
    url_rewrite: Option<UrlRewrite>,
}

impl Resolver {
    /// Create a resolver for pages under `source_dir`.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, links: LinkTable, appendix: AppendixInjector) -> Self {
        Self {
            source_dir: source_dir.into(),
            links,
            appendix,
            url_rewrite: None,
        }
    }

    /// Rewrite repository links in every page before substitution.
    #[must_use]
    pub fn with_url_rewrite(mut self, rewrite: UrlRewrite) -> Self {
        self.url_rewrite = Some(rewrite);
        self
    }

    /// Load a page and apply the steps shared by both passes.
    ///
    /// In order: appendix injection, repository link rewrite, front matter
    /// removal.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::MissingSource`] if the page file is gone and
    /// [`CorpusError::Io`] if it or its appendix cannot be read.
    pub fn preprocess(&self, page: &PagePath) -> Result<String, CorpusError> {
        let mut text = read_source(&page.to_fs(&self.source_dir))?;
        if text.contains(APPENDIX_TOKEN) {
            let appendix = self.appendix.build(page)?;
            text = text.replace(APPENDIX_TOKEN, &appendix);
        }
        if let Some(rewrite) = &self.url_rewrite {
            text = rewrite.apply(&text);
        }
        Ok(strip_front_matter(&text).to_owned())
    }

    /// Resolve every page.
    ///
    /// Pages are processed in parallel within each pass. The first failure
    /// aborts resolution.
    ///
    /// # Errors
    ///
    /// Returns the first [`CorpusError`] raised while preprocessing a page.
    pub fn resolve(&self, pages: &[PagePath]) -> Result<ResolvedCorpus, CorpusError> {
        let sources: Vec<(&PagePath, String)> = pages
            .par_iter()
            .map(|page| self.preprocess(page).map(|text| (page, text)))
            .collect::<Result<_, _>>()?;

        let mut vars = VariableTable::with_links(&self.links);
        let pass1: Vec<(&PagePath, String)> = sources
            .par_iter()
            .map(|(page, text)| (*page, substitute(text, &self.links).into_owned()))
            .collect();
        for (page, text) in pass1 {
            vars.insert(page.as_str(), text);
        }
        tracing::debug!(pages = pages.len(), variables = vars.len(), "Collected page variables");

        let resolved: BTreeMap<PagePath, String> = sources
            .par_iter()
            .map(|(page, text)| ((*page).clone(), substitute(text, &vars).into_owned()))
            .collect();
        tracing::info!(pages = resolved.len(), "Resolved markdown corpus");

        Ok(ResolvedCorpus { pages: resolved })
    }
}

/// Fully resolved markdown of every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCorpus {
    pages: BTreeMap<PagePath, String>,
}

impl ResolvedCorpus {
    #[must_use]
    pub fn get(&self, page: &PagePath) -> Option<&str> {
        self.pages.get(page).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&PagePath, &str)> {
        self.pages.iter().map(|(page, text)| (page, text.as_str()))
    }

    /// Write every page to the same relative path under `dir`.
    ///
    /// Each file ends with a newline. Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Io`] if a directory or file cannot be written.
    pub fn write_markdown(&self, dir: &Path) -> Result<usize, CorpusError> {
        for (page, text) in &self.pages {
            let path = page.to_fs(dir);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| CorpusError::io(parent, e))?;
            }
            tracing::debug!(path = %path.display(), "Writing resolved markdown");
            fs::write(&path, format!("{text}\n")).map_err(|e| CorpusError::io(&path, e))?;
        }
        Ok(self.pages.len())
    }
}

impl FromIterator<(PagePath, String)> for ResolvedCorpus {
    fn from_iter<T: IntoIterator<Item = (PagePath, String)>>(iter: T) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use mdsite_config::AppendixConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        _tmp: TempDir,
        source: PathBuf,
        modules: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let source = tmp.path().join("md");
            let modules = tmp.path().to_path_buf();
            fs::create_dir_all(&source).unwrap();
            Self {
                _tmp: tmp,
                source,
                modules,
            }
        }

        fn page(&self, rel: &str, content: &str) -> PagePath {
            let path = self.source.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
            PagePath::new(rel)
        }

        fn module_file(&self, rel: &str, content: &str) {
            let path = self.modules.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn resolver(&self, links: &[(&str, &str)]) -> Resolver {
            let config = AppendixConfig {
                modules_dir: self.modules.clone(),
                ..AppendixConfig::default()
            };
            let links = links
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect();
            Resolver::new(&self.source, links, AppendixInjector::new(config, &self.source))
                .with_url_rewrite(UrlRewrite::new(
                    "https://github.com/jooby-project/jooby/tree/master/jooby-",
                    "/doc/",
                ))
        }
    }

    #[test]
    fn test_links_resolved() {
        let fx = Fixture::new();
        let page = fx.page("index.md", "Visit {{site}} or {{unknown}}.\n");

        let corpus = fx.resolver(&[("site", "/")]).resolve(&[page.clone()]).unwrap();
        assert_eq!(corpus.get(&page), Some("Visit / or {{unknown}}."));
    }

    #[test]
    fn test_page_transclusion_uses_pass_one_text() {
        let fx = Fixture::new();
        let guide = fx.page("doc/guide/README.md", "Guide for {{Jooby}}");
        let index = fx.page("index.md", "# Home\n\n{{doc/guide/README.md}}");

        let corpus = fx
            .resolver(&[("Jooby", "[Jooby](/)")])
            .resolve(&[guide.clone(), index.clone()])
            .unwrap();

        assert_eq!(corpus.get(&index), Some("# Home\n\nGuide for [Jooby](/)"));
        assert_eq!(corpus.get(&guide), Some("Guide for [Jooby](/)"));
    }

    #[test]
    fn test_transclusion_is_one_level_deep() {
        let fx = Fixture::new();
        let a = fx.page("a.md", "A({{b.md}})");
        let b = fx.page("b.md", "B({{c.md}})");
        let c = fx.page("c.md", "C");

        let corpus = fx
            .resolver(&[])
            .resolve(&[a.clone(), b.clone(), c.clone()])
            .unwrap();

        assert_eq!(corpus.get(&a), Some("A(B({{c.md}}))"));
        assert_eq!(corpus.get(&b), Some("B(C)"));
    }

    #[test]
    fn test_transclusion_of_unusual_page_names() {
        let fx = Fixture::new();
        let guide = fx.page("doc/my guide/README.md", "GUIDE");
        let uber = fx.page("doc/über/README.md", "UBER");
        let index = fx.page(
            "index.md",
            "A {{doc/my guide/README.md}} B {{doc/über/README.md}}",
        );

        let corpus = fx
            .resolver(&[])
            .resolve(&[guide, uber, index.clone()])
            .unwrap();

        assert_eq!(corpus.get(&index), Some("A GUIDE B UBER"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let fx = Fixture::new();
        let page = fx.page("loop.md", "x{{loop.md}}");

        let corpus = fx.resolver(&[]).resolve(&[page.clone()]).unwrap();
        assert_eq!(corpus.get(&page), Some("xx{{loop.md}}"));
    }

    #[test]
    fn test_toc_placeholder_is_removed() {
        let fx = Fixture::new();
        let page = fx.page("index.md", "a{{toc.md}}b");

        let corpus = fx.resolver(&[]).resolve(&[page.clone()]).unwrap();
        assert_eq!(corpus.get(&page), Some("ab"));
    }

    #[test]
    fn test_front_matter_and_url_rewrite() {
        let fx = Fixture::new();
        let page = fx.page(
            "doc/jdbc/README.md",
            "---\ntitle: jdbc\n---\nSee https://github.com/jooby-project/jooby/tree/master/jooby-hbm",
        );

        let corpus = fx.resolver(&[]).resolve(&[page.clone()]).unwrap();
        assert_eq!(corpus.get(&page), Some("\nSee /doc/hbm"));
    }

    #[test]
    fn test_appendix_injected() {
        let fx = Fixture::new();
        fx.module_file("jooby-jdbc/src/main/resources/jdbc.conf", "db = mem");
        let page = fx.page("doc/jdbc/README.md", "# jdbc\n\n{{appendix}}");

        let corpus = fx.resolver(&[]).resolve(&[page.clone()]).unwrap();
        assert_eq!(
            corpus.get(&page),
            Some("# jdbc\n\n## jdbc.conf\n\n```properties\ndb = mem\n```\n\n")
        );
    }

    #[test]
    fn test_appendix_visible_through_transclusion() {
        let fx = Fixture::new();
        fx.module_file("jooby-jdbc/src/main/resources/jdbc.conf", "db = mem");
        let jdbc = fx.page("doc/jdbc/README.md", "{{appendix}}");
        let all = fx.page("doc/all.md", "{{doc/jdbc/README.md}}");

        let corpus = fx.resolver(&[]).resolve(&[jdbc, all.clone()]).unwrap();
        assert!(corpus.get(&all).unwrap().contains("## jdbc.conf"));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let fx = Fixture::new();
        let page = fx.page("index.md", "x");
        let gone = PagePath::new("gone.md");

        let err = fx.resolver(&[]).resolve(&[page, gone]).unwrap_err();
        assert!(matches!(err, CorpusError::MissingSource(_)));
    }

    #[test]
    fn test_write_markdown() {
        let fx = Fixture::new();
        let page = fx.page("doc/index.md", "{{site}}");
        let corpus = fx.resolver(&[("site", "/")]).resolve(&[page]).unwrap();

        let out = TempDir::new().unwrap();
        let written = corpus.write_markdown(out.path()).unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            fs::read_to_string(out.path().join("doc/index.md")).unwrap(),
            "/\n"
        );
    }
}

//! Static site builder.
//!
//! Build order:
//! 1. Discover every `.md` page under the source root
//! 2. Resolve the corpus (appendix, links, transclusion)
//! 3. Render each page of interest: markdown, sections, template
//! 4. Mirror static assets into `{output}/resources`

use std::fs;
use std::path::{Path, PathBuf};

use mdsite_config::{Config, TemplatesConfig};
use mdsite_corpus::{
    AppendixInjector, LinkTable, PagePath, PageRewrites, ResolvedCorpus, Resolver, UrlRewrite,
};
use mdsite_renderer::{MarkdownRenderer, PageVars, TemplateError, TemplateRenderer};

use crate::assets::copy_assets;
use crate::error::SiteError;
use crate::layout::{is_page_of_interest, is_root_index, output_path, template_name};
use crate::scanner::Scanner;

/// Directory under the output root receiving static assets.
const RESOURCES_DIR: &str = "resources";

/// Summary of a completed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// HTML pages written.
    pub pages_written: usize,
    /// Pages of interest skipped because their source vanished.
    pub pages_skipped: usize,
    /// Static assets copied.
    pub assets_copied: usize,
}

/// Builds the static site described by a [`Config`].
pub struct SiteBuilder {
    source_dir: PathBuf,
    output_dir: PathBuf,
    resources_dir: PathBuf,
    markdown_dir: Option<PathBuf>,
    resolver: Resolver,
    rewrites: PageRewrites,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
    fallback: TemplatesConfig,
}

impl SiteBuilder {
    /// Create a builder from resolved configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let docs = &config.docs_resolved;
        let links: LinkTable = config
            .links
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let appendix = AppendixInjector::new(config.appendix_resolved.clone(), &docs.source_dir);
        let resolver = Resolver::new(&docs.source_dir, links, appendix).with_url_rewrite(
            UrlRewrite::new(&config.rewrite.source_url, &config.rewrite.target),
        );

        Self {
            source_dir: docs.source_dir.clone(),
            output_dir: docs.output_dir.clone(),
            resources_dir: docs.resources_dir.clone(),
            markdown_dir: docs.markdown_dir.clone(),
            resolver,
            rewrites: config.page_rewrites.iter().collect(),
            markdown: MarkdownRenderer::new(),
            templates: TemplateRenderer::new(&docs.templates_dir),
            fallback: config.templates.clone(),
        }
    }

    /// Output root.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the site.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not a vanished page: unreadable
    /// sources, a missing template, a failed render or a failed write.
    pub fn build(&self) -> Result<BuildReport, SiteError> {
        let pages = Scanner::new(&self.source_dir).scan()?;
        tracing::info!(pages = pages.len(), source = %self.source_dir.display(), "Discovered pages");

        let corpus = self.resolver.resolve(&pages)?;
        if let Some(dir) = &self.markdown_dir {
            let written = corpus.write_markdown(dir)?;
            tracing::info!(files = written, dir = %dir.display(), "Wrote resolved markdown");
        }

        let mut report = self.assemble(&pages, &corpus)?;
        report.assets_copied =
            copy_assets(&self.resources_dir, &self.output_dir.join(RESOURCES_DIR))?;

        tracing::info!(
            written = report.pages_written,
            skipped = report.pages_skipped,
            assets = report.assets_copied,
            "Site built"
        );
        Ok(report)
    }

    /// Render every page of interest. Pages whose source is gone by now are
    /// skipped and counted.
    fn assemble(
        &self,
        pages: &[PagePath],
        corpus: &ResolvedCorpus,
    ) -> Result<BuildReport, SiteError> {
        let mut report = BuildReport::default();
        for page in pages.iter().filter(|page| is_page_of_interest(page)) {
            match self.build_page(corpus, page) {
                Ok(path) => {
                    tracing::debug!(page = %page, output = %path.display(), "Wrote page");
                    report.pages_written += 1;
                }
                Err(SiteError::MissingSource(page)) => {
                    tracing::warn!(page = %page, "Page source vanished during the build, skipping");
                    report.pages_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    /// Render one page and write it. Returns the output path.
    fn build_page(&self, corpus: &ResolvedCorpus, page: &PagePath) -> Result<PathBuf, SiteError> {
        if !page.to_fs(&self.source_dir).is_file() {
            return Err(SiteError::MissingSource(page.clone()));
        }
        let text = corpus
            .get(page)
            .ok_or_else(|| SiteError::MissingSource(page.clone()))?;
        let text = self.rewrites.apply(page, text);

        let html = self.markdown.render(&text);
        let sections = mdsite_sections::restructure(&html, is_root_index(page));
        let toc = sections.toc.to_html();
        let vars = PageVars {
            main: &sections.body,
            toc: &toc,
            page_header: sections.title.as_deref(),
        };

        let rendered = self.render_template(page, &vars)?;

        let path = output_path(&self.output_dir, page);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
        }
        fs::write(&path, format!("{}\n", rendered.trim())).map_err(|e| SiteError::io(&path, e))?;
        Ok(path)
    }

    /// Render with the page's own template, or the fallback for pages under
    /// the fallback prefix.
    fn render_template(&self, page: &PagePath, vars: &PageVars<'_>) -> Result<String, SiteError> {
        let name = template_name(page);
        match self.templates.render(&name, vars) {
            Err(TemplateError::NotFound(_)) if name.starts_with(&self.fallback.fallback_prefix) => {
                tracing::debug!(page = %page, template = %self.fallback.fallback, "Using fallback template");
                self.templates
                    .render(&self.fallback.fallback, vars)
                    .map_err(missing_template)
            }
            result => result.map_err(missing_template),
        }
    }
}

fn missing_template(err: TemplateError) -> SiteError {
    match err {
        TemplateError::NotFound(name) => SiteError::MissingTemplate(name),
        other => SiteError::Template(other),
    }
}

//! Generated appendix listing a module's configuration files.
//!
//! The `{{appendix}}` token of `doc/jdbc/README.md` expands to every
//! `.conf`/`.properties` file of module `jooby-jdbc`, each as a fenced block
//! under its own heading. Pages inside the doc directory itself document
//! the base module `jooby`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use mdsite_config::AppendixConfig;
use regex::Regex;

use crate::error::CorpusError;
use crate::page::PagePath;
use crate::source::normalize_lines;

/// Two or more consecutive blank lines.
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run pattern is valid"));

/// Builds the appendix text for a page.
#[derive(Debug, Clone)]
pub struct AppendixInjector {
    config: AppendixConfig,
    /// Directory name used for pages at the source root.
    root_name: String,
}

impl AppendixInjector {
    /// Create an injector for pages under `source_dir`.
    #[must_use]
    pub fn new(config: AppendixConfig, source_dir: &Path) -> Self {
        let root_name = source_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { config, root_name }
    }

    /// Module documented by `page`.
    #[must_use]
    pub fn module_name(&self, page: &PagePath) -> String {
        let parent = page.parent_name().unwrap_or(&self.root_name);
        if parent == self.config.doc_dir {
            self.config.module_prefix.clone()
        } else {
            format!("{}-{parent}", self.config.module_prefix)
        }
    }

    /// Configuration directory of the module documented by `page`.
    #[must_use]
    pub fn config_dir(&self, page: &PagePath) -> PathBuf {
        self.config
            .modules_dir
            .join(self.module_name(page))
            .join(&self.config.resources_subdir)
    }

    /// Build the appendix for `page`.
    ///
    /// A module without a configuration directory yields an empty appendix.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Io`] if the directory or one of its files
    /// cannot be read.
    pub fn build(&self, page: &PagePath) -> Result<String, CorpusError> {
        let dir = self.config_dir(page);
        let mut files = Vec::new();
        match collect_files(&dir, &self.config.extensions, &mut files) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(page = %page, dir = %dir.display(), "No configuration directory");
                return Ok(String::new());
            }
            Err(e) => return Err(CorpusError::io(dir, e)),
        }
        // By file name; the path orders files of the same name.
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

        let level = if page.as_str() == self.config.root_index {
            "#"
        } else {
            "##"
        };

        let mut entries = Vec::with_capacity(files.len());
        for path in &files {
            let contents = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
            let contents = normalize_lines(&contents);
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            entries.push(format!(
                "{level} {name}\n\n```{}\n{}\n```\n\n",
                self.config.fence_lang,
                BLANK_RUN.replace_all(&contents, "\n\n")
            ));
        }

        tracing::debug!(page = %page, files = entries.len(), "Built appendix");
        Ok(entries.join("\n"))
    }
}

/// Recursively collect files ending in `.{ext}` for any of `extensions`.
fn collect_files(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, extensions, files)?;
        } else if has_extension(&path, extensions) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    /// Layout: `{tmp}/md` sources with modules next to it.
    fn setup() -> (TempDir, AppendixInjector) {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("md");
        fs::create_dir_all(&source).unwrap();
        let config = AppendixConfig {
            modules_dir: tmp.path().to_path_buf(),
            ..AppendixConfig::default()
        };
        let injector = AppendixInjector::new(config, &source);
        (tmp, injector)
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_module_name() {
        let (_tmp, injector) = setup();
        assert_eq!(injector.module_name(&PagePath::new("doc/index.md")), "jooby");
        assert_eq!(injector.module_name(&PagePath::new("doc/jdbc/README.md")), "jooby-jdbc");
        assert_eq!(injector.module_name(&PagePath::new("index.md")), "jooby-md");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let (_tmp, injector) = setup();
        let appendix = injector.build(&PagePath::new("doc/nothing/README.md")).unwrap();
        assert_eq!(appendix, "");
    }

    #[test]
    fn test_entries_sorted_with_section_level() {
        let (tmp, injector) = setup();
        let resources = "jooby-jdbc/src/main/resources";
        write(tmp.path(), &format!("{resources}/jdbc.conf"), "db = mem\n");
        write(tmp.path(), &format!("{resources}/a/pool.properties"), "size=10");
        write(tmp.path(), &format!("{resources}/ignored.txt"), "nope");

        let appendix = injector.build(&PagePath::new("doc/jdbc/README.md")).unwrap();

        assert_eq!(
            appendix,
            "## jdbc.conf\n\n```properties\ndb = mem\n```\n\n\n\
             ## pool.properties\n\n```properties\nsize=10\n```\n\n"
        );
    }

    #[test]
    fn test_same_file_name_ordered_by_path() {
        let (tmp, injector) = setup();
        let resources = "jooby-jdbc/src/main/resources";
        write(tmp.path(), &format!("{resources}/prod/db.conf"), "env = prod");
        write(tmp.path(), &format!("{resources}/dev/db.conf"), "env = dev");
        write(tmp.path(), &format!("{resources}/z/app.conf"), "z = 1");

        let appendix = injector.build(&PagePath::new("doc/jdbc/README.md")).unwrap();

        let app = appendix.find("z = 1").unwrap();
        let dev = appendix.find("env = dev").unwrap();
        let prod = appendix.find("env = prod").unwrap();
        assert!(app < dev && dev < prod);
    }

    #[test]
    fn test_root_index_uses_top_level_headers() {
        let (tmp, injector) = setup();
        write(tmp.path(), "jooby/src/main/resources/application.conf", "a = 1");

        let appendix = injector.build(&PagePath::new("doc/index.md")).unwrap();
        assert!(appendix.starts_with("# application.conf\n\n```properties\na = 1\n```"));

        let other = injector.build(&PagePath::new("doc/README.md")).unwrap();
        assert!(other.starts_with("## application.conf"));
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let (tmp, injector) = setup();
        write(
            tmp.path(),
            "jooby/src/main/resources/application.conf",
            "a = 1\r\n\r\n\r\n\r\nb = 2\n\nc = 3\n",
        );

        let appendix = injector.build(&PagePath::new("doc/README.md")).unwrap();
        assert_eq!(
            appendix,
            "## application.conf\n\n```properties\na = 1\n\nb = 2\n\nc = 3\n```\n\n"
        );
    }

    #[test]
    fn test_configured_extensions_and_fence() {
        let tmp = TempDir::new().unwrap();
        let config = AppendixConfig {
            modules_dir: tmp.path().to_path_buf(),
            extensions: vec!["yaml".to_owned()],
            fence_lang: "yaml".to_owned(),
            ..AppendixConfig::default()
        };
        let injector = AppendixInjector::new(config, &tmp.path().join("md"));
        write(tmp.path(), "jooby/src/main/resources/app.yaml", "a: 1");
        write(tmp.path(), "jooby/src/main/resources/app.conf", "a = 1");

        let appendix = injector.build(&PagePath::new("doc/README.md")).unwrap();
        assert_eq!(appendix, "## app.yaml\n\n```yaml\na: 1\n```\n\n");
    }
}

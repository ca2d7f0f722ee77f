//! Configuration management for mdsite.
//!
//! Parses `mdsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `links.*`
//! - `rewrite.source_url`
//! - `rewrite.target`

mod expand;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override site output directory.
    pub output_dir: Option<PathBuf>,
    /// Override page templates directory.
    pub templates_dir: Option<PathBuf>,
    /// Write resolved markdown to this directory.
    pub markdown_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdsite.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory layout (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Appendix generation (paths are relative strings from TOML).
    appendix: AppendixConfigRaw,
    /// Source repository URL rewrite.
    pub rewrite: RewriteConfig,
    /// Template lookup.
    pub templates: TemplatesConfig,
    /// Link shortcuts available as `{{name}}` in every page.
    pub links: BTreeMap<String, String>,
    /// Per-page text replacements applied before rendering.
    pub page_rewrites: Vec<PageRewriteConfig>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved appendix configuration (set after loading).
    #[serde(skip)]
    pub appendix_resolved: AppendixConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    markdown_dir: Option<String>,
    templates_dir: Option<String>,
    resources_dir: Option<String>,
}

/// Resolved directory layout with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct DocsConfig {
    /// Root of the markdown corpus.
    pub source_dir: PathBuf,
    /// Root of the generated site.
    pub output_dir: PathBuf,
    /// Optional dump of resolved markdown, mirroring the source tree.
    pub markdown_dir: Option<PathBuf>,
    /// Page templates, addressed by relative name without `.html`.
    pub templates_dir: PathBuf,
    /// Static assets copied to `{output_dir}/resources`.
    pub resources_dir: PathBuf,
}

impl DocsConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            source_dir: base.join("docs"),
            output_dir: base.join("target/site"),
            markdown_dir: None,
            templates_dir: base.join("templates"),
            resources_dir: base.join("resources"),
        }
    }
}

/// Raw appendix configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AppendixConfigRaw {
    modules_dir: Option<String>,
    module_prefix: Option<String>,
    doc_dir: Option<String>,
    resources_subdir: Option<String>,
    extensions: Option<Vec<String>>,
    root_index: Option<String>,
    fence_lang: Option<String>,
}

/// Resolved appendix configuration.
///
/// The appendix of page `doc/jdbc/README.md` lists the configuration files
/// under `{modules_dir}/{module_prefix}-jdbc/{resources_subdir}`. Pages
/// directly inside `doc_dir` use the bare `module_prefix` module.
#[derive(Debug, Clone)]
pub struct AppendixConfig {
    /// Directory containing one subdirectory per module.
    pub modules_dir: PathBuf,
    /// Module base name.
    pub module_prefix: String,
    /// Directory name whose pages document the base module.
    pub doc_dir: String,
    /// Configuration directory inside a module.
    pub resources_subdir: PathBuf,
    /// File extensions listed in the appendix, without dot.
    pub extensions: Vec<String>,
    /// Page whose appendix uses level-1 headers.
    pub root_index: String,
    /// Fence language of each listed file.
    pub fence_lang: String,
}

impl Default for AppendixConfig {
    fn default() -> Self {
        Self {
            modules_dir: PathBuf::from("."),
            module_prefix: "jooby".to_owned(),
            doc_dir: "doc".to_owned(),
            resources_subdir: PathBuf::from("src/main/resources"),
            extensions: vec!["conf".to_owned(), "properties".to_owned()],
            root_index: "doc/index.md".to_owned(),
            fence_lang: "properties".to_owned(),
        }
    }
}

/// Rewrite of absolute source repository links into site links.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// URL prefix to replace.
    pub source_url: String,
    /// Replacement prefix.
    pub target: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            source_url: "https://github.com/jooby-project/jooby/tree/master/jooby-".to_owned(),
            target: "/doc/".to_owned(),
        }
    }
}

/// Template lookup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Pages under this prefix fall back to [`Self::fallback`].
    pub fallback_prefix: String,
    /// Template used when a page under the prefix has no template of its own.
    pub fallback: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            fallback_prefix: "doc/".to_owned(),
            fallback: "doc/mod".to_owned(),
        }
    }
}

/// First-occurrence text replacement in one page's resolved markdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageRewriteConfig {
    /// Root-relative page path, e.g. `quickstart/index.md`.
    pub page: String,
    /// Literal text to find.
    pub find: String,
    /// Replacement text.
    #[serde(default)]
    pub replace: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`links.version`").
        field: String,
        /// Error message (e.g., "${`MDSITE_VERSION`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Whether `name` can appear inside a `{{name}}` placeholder.
fn is_link_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// A new source directory also moves the default modules directory,
    /// unless `appendix.modules_dir` was set explicitly.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
            if self.appendix.modules_dir.is_none() {
                self.appendix_resolved.modules_dir = default_modules_dir(source_dir);
            }
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(templates_dir) = &settings.templates_dir {
            self.docs_resolved.templates_dir.clone_from(templates_dir);
        }
        if let Some(markdown_dir) = &settings.markdown_dir {
            self.docs_resolved.markdown_dir = Some(markdown_dir.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let docs_resolved = DocsConfig::with_base(base);
        let appendix_resolved = AppendixConfig {
            modules_dir: default_modules_dir(&docs_resolved.source_dir),
            ..AppendixConfig::default()
        };
        Self {
            docs: DocsConfigRaw::default(),
            appendix: AppendixConfigRaw::default(),
            rewrite: RewriteConfig::default(),
            templates: TemplatesConfig::default(),
            links: BTreeMap::new(),
            page_rewrites: Vec::new(),
            docs_resolved,
            appendix_resolved,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_appendix()?;
        require_non_empty(&self.rewrite.source_url, "rewrite.source_url")?;
        require_non_empty(&self.templates.fallback, "templates.fallback")?;
        self.validate_links()?;
        self.validate_page_rewrites()?;
        Ok(())
    }

    fn validate_appendix(&self) -> Result<(), ConfigError> {
        let appendix = &self.appendix_resolved;
        require_non_empty(&appendix.module_prefix, "appendix.module_prefix")?;
        require_non_empty(&appendix.doc_dir, "appendix.doc_dir")?;
        require_non_empty(&appendix.fence_lang, "appendix.fence_lang")?;
        if appendix.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "appendix.extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &appendix.extensions {
            require_non_empty(ext, "appendix.extensions")?;
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "appendix.extensions entry \"{ext}\" must not start with a dot"
                )));
            }
        }
        Ok(())
    }

    /// Link names must be placeholder identifiers outside the page namespace.
    fn validate_links(&self) -> Result<(), ConfigError> {
        for name in self.links.keys() {
            if !is_link_name(name) {
                return Err(ConfigError::Validation(format!(
                    "links.{name}: name may only contain letters, digits, '_', '-' and '.'"
                )));
            }
            if name.ends_with(".md") {
                return Err(ConfigError::Validation(format!(
                    "links.{name}: names ending in .md are reserved for pages"
                )));
            }
        }
        Ok(())
    }

    fn validate_page_rewrites(&self) -> Result<(), ConfigError> {
        for (index, rewrite) in self.page_rewrites.iter().enumerate() {
            require_non_empty(&rewrite.page, &format!("page_rewrites[{index}].page"))?;
            require_non_empty(&rewrite.find, &format!("page_rewrites[{index}].find"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (name, value) in &mut self.links {
            *value = expand::expand_env(value, &format!("links.{name}"))?;
        }
        self.rewrite.source_url = expand::expand_env(&self.rewrite.source_url, "rewrite.source_url")?;
        self.rewrite.target = expand::expand_env(&self.rewrite.target, "rewrite.target")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let docs = &self.docs;
        self.docs_resolved = DocsConfig {
            source_dir: resolve(docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(docs.output_dir.as_deref(), "target/site"),
            markdown_dir: docs.markdown_dir.as_deref().map(|dir| config_dir.join(dir)),
            templates_dir: resolve(docs.templates_dir.as_deref(), "templates"),
            resources_dir: resolve(docs.resources_dir.as_deref(), "resources"),
        };

        let raw = &self.appendix;
        let defaults = AppendixConfig::default();
        self.appendix_resolved = AppendixConfig {
            modules_dir: raw.modules_dir.as_deref().map_or_else(
                || default_modules_dir(&self.docs_resolved.source_dir),
                |dir| config_dir.join(dir),
            ),
            module_prefix: raw.module_prefix.clone().unwrap_or(defaults.module_prefix),
            doc_dir: raw.doc_dir.clone().unwrap_or(defaults.doc_dir),
            resources_subdir: raw
                .resources_subdir
                .as_deref()
                .map_or(defaults.resources_subdir, PathBuf::from),
            extensions: raw.extensions.clone().unwrap_or(defaults.extensions),
            root_index: raw.root_index.clone().unwrap_or(defaults.root_index),
            fence_lang: raw.fence_lang.clone().unwrap_or(defaults.fence_lang),
        };
    }
}

/// Modules live next to the docs directory unless configured otherwise.
fn default_modules_dir(source_dir: &Path) -> PathBuf {
    source_dir
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

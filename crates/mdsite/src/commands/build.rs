//! `mdsite build` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_site::SiteBuilder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Page templates directory (overrides config).
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Also write the resolved markdown to this directory.
    #[arg(long)]
    markdown_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long, env = "MDSITE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            templates_dir: self.templates_dir,
            markdown_dir: self.markdown_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.docs_resolved.output_dir.display()
        ));

        let builder = SiteBuilder::new(&config);
        let report = builder.build()?;

        if report.pages_skipped > 0 {
            output.warning(&format!(
                "Skipped {} page(s) missing from the resolved corpus",
                report.pages_skipped
            ));
        }
        output.success(&format!(
            "Built {} page(s) and copied {} asset(s) to {}",
            report.pages_written,
            report.assets_copied,
            builder.output_dir().display()
        ));
        Ok(())
    }
}

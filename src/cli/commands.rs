use crate::core::models::OutputStyle;
use crate::core::plugin::PluginManager;
use crate::core::sass_modules::SassModulesPlugin;
use crate::infrastructure::{BundleHost, TokioFileSystemService};
use crate::utils::{CliOverrides, ConfigLoader, Logger, SassModulesError};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sass-modules")]
#[command(about = "Compile SCSS/SASS stylesheets into importable JS modules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum StyleArg {
    Expanded,
    Compressed,
}

impl From<StyleArg> for OutputStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Expanded => OutputStyle::Expanded,
            StyleArg::Compressed => OutputStyle::Compressed,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build entry modules and their stylesheet dependencies
    Build {
        /// Entry modules (defaults to `entries` from the config file)
        entries: Vec<String>,
        /// Root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Output directory for transformed modules
        #[arg(short, long)]
        outdir: Option<String>,
        /// Combine all compiled CSS into this single file
        #[arg(long)]
        out_file: Option<String>,
        /// Inject a <style> element instead of exporting the CSS
        #[arg(long)]
        insert: bool,
        /// Module id globs to compile (repeatable)
        #[arg(long)]
        include: Vec<String>,
        /// Module id globs to skip (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Compiler output style
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Minify compiled CSS with LightningCSS
        #[arg(long)]
        minify: bool,
        /// Config file (default: <root>/sass-modules.config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version and an example config file
    Info,
}

pub struct CliHandler;

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Build {
                entries,
                root,
                outdir,
                out_file,
                insert,
                include,
                exclude,
                style,
                minify,
                config,
            } => {
                let overrides = CliOverrides {
                    entries,
                    outdir,
                    include,
                    exclude,
                    insert: insert.then_some(true),
                    minify: minify.then_some(true),
                    out_file,
                    output_style: style.map(OutputStyle::from),
                };
                self.handle_build_command(&root, config, overrides).await
            }
            Commands::Info => {
                self.handle_info_command();
                Ok(())
            }
        }
    }

    async fn handle_build_command(
        &self,
        root: &str,
        config: Option<PathBuf>,
        overrides: CliOverrides,
    ) -> Result<()> {
        let root = std::fs::canonicalize(root)
            .with_context(|| format!("Root directory {} is not accessible", root))?;
        let file_config = ConfigLoader::load_from_file(&root, config.as_deref())?;
        let settings = ConfigLoader::merge_with_cli(file_config, root, overrides);

        if settings.entries.is_empty() {
            return Err(SassModulesError::config(
                "no entry modules given on the command line or in the config file".to_string(),
            )
            .into());
        }

        Logger::build_start(&settings.root, &settings.outdir);

        let plugin = SassModulesPlugin::new(settings.plugin)?;
        let mut plugins = PluginManager::new();
        plugins.register(Arc::new(plugin));

        let host = BundleHost::new(plugins, Arc::new(TokioFileSystemService), settings.root)
            .with_outdir(settings.outdir);
        host.build(&settings.entries).await?;

        Ok(())
    }

    fn handle_info_command(&self) {
        println!("sass-modules {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Example {}:", crate::utils::CONFIG_FILE_NAME);
        println!("{}", ConfigLoader::generate_example());
    }
}

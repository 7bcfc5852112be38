use crate::core::interfaces::CssPostProcessor;
use crate::core::models::{CompilerOptions, OutputStyle};
use crate::core::sass_modules::SassModulesOptions;
use crate::infrastructure::LightningCssProcessor;
use crate::utils::{Logger, Result, SassModulesError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_FILE_NAME: &str = "sass-modules.config.json";

/// Configuration file format (sass-modules.config.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SassModulesConfig {
    /// Entry modules, relative to the root
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,

    /// Output directory for transformed modules (default: "dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdir: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Inject a <style> element instead of exporting CSS (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert: Option<bool>,

    /// Minify compiled CSS with LightningCSS (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    /// Pass-through compiler options
    #[serde(default)]
    pub options: CompilerOptions,
}

/// Values given on the command line; `None` defers to the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub entries: Vec<String>,
    pub outdir: Option<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub insert: Option<bool>,
    pub minify: Option<bool>,
    pub out_file: Option<String>,
    pub output_style: Option<OutputStyle>,
}

/// Fully merged settings for one build
#[derive(Clone)]
pub struct BuildSettings {
    pub root: PathBuf,
    pub outdir: PathBuf,
    pub entries: Vec<PathBuf>,
    pub plugin: SassModulesOptions,
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `path`, or from the root's default file
    pub fn load_from_file(root: &Path, path: Option<&Path>) -> Result<Option<SassModulesConfig>> {
        let config_path = match path {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => root.join(p),
            None => root.join(CONFIG_FILE_NAME),
        };

        if !config_path.exists() {
            if path.is_some() {
                return Err(SassModulesError::config(format!(
                    "Config file not found: {}",
                    config_path.display()
                )));
            }
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path)?;
        let config: SassModulesConfig = serde_json::from_str(&content).map_err(|e| {
            SassModulesError::config(format!(
                "Failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(Some(config))
    }

    /// Merge file config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(
        file_config: Option<SassModulesConfig>,
        root: PathBuf,
        cli: CliOverrides,
    ) -> BuildSettings {
        let base = file_config.unwrap_or_default();

        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };

        let entries = if cli.entries.is_empty() {
            base.entries
        } else {
            cli.entries
        };
        let outdir = cli
            .outdir
            .or(base.outdir)
            .unwrap_or_else(|| "dist".to_string());

        let mut options = base.options;
        if let Some(out_file) = cli.out_file {
            options.out_file = Some(PathBuf::from(out_file));
        }
        options.out_file = options.out_file.map(|p| resolve(p.as_path()));
        options.include_paths = options
            .include_paths
            .iter()
            .map(|p| resolve(p.as_path()))
            .collect();
        if let Some(style) = cli.output_style {
            options.output_style = style;
        }

        let minify = cli.minify.or(base.minify).unwrap_or(false);
        let processor: Option<Arc<dyn CssPostProcessor>> = if minify {
            Some(Arc::new(LightningCssProcessor::new(true)))
        } else {
            None
        };

        let plugin = SassModulesOptions {
            include: if cli.include.is_empty() { base.include } else { cli.include },
            exclude: if cli.exclude.is_empty() { base.exclude } else { cli.exclude },
            insert: cli.insert.or(base.insert).unwrap_or(false),
            processor,
            options,
            ..Default::default()
        };

        BuildSettings {
            outdir: resolve(Path::new(&outdir)),
            entries: entries.iter().map(|e| resolve(Path::new(e))).collect(),
            root: root.clone(),
            plugin,
        }
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        let example = SassModulesConfig {
            entries: vec!["src/main.js".to_string()],
            outdir: Some("dist".to_string()),
            include: vec!["**/*.scss".to_string(), "**/*.sass".to_string()],
            insert: Some(false),
            minify: Some(false),
            options: CompilerOptions {
                out_file: Some(PathBuf::from("dist/bundle.css")),
                ..Default::default()
            },
            ..Default::default()
        };
        serde_json::to_string_pretty(&example).unwrap_or_default()
    }
}

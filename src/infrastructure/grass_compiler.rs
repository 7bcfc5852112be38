//! SCSS/SASS compilation using the grass crate.
//!
//! grass has no importer callback, so the import resolver is plugged in
//! through its filesystem abstraction instead. Every stylesheet `ImporterFs`
//! hands to grass has its quoted `@import` targets resolved up front and
//! rewritten to absolute paths, so nested imports resolve exactly like
//! top-level ones. Targets the resolver rejects are left for grass's own
//! lookup (load paths); the rejection is kept for the error message.

use crate::core::interfaces::{ImportCallback, StyleCompiler};
use crate::core::models::{CompileRequest, CompiledCss, OutputStyle};
use crate::utils::{ErrorContext, Logger, Result, SassModulesError, Timer};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

/// `@import` followed by one or more comma-separated quoted targets
static IMPORT_STATEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@import\s+((?:(?:'[^'\n]*'|"[^"\n]*")\s*,\s*)*(?:'[^'\n]*'|"[^"\n]*"))"#)
        .expect("valid regex")
});

static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"'([^'\n]*)'|"([^"\n]*)""#).expect("valid regex"));

/// Adapter that implements `grass::Fs` on top of an [`ImportCallback`]
pub struct ImporterFs {
    entry: PathBuf,
    entry_source: String,
    callback: ImportCallback,
    /// Contents the resolver returned, keyed by resolved file
    loaded: Mutex<HashMap<PathBuf, String>>,
    /// Resolver errors for targets left to grass
    failures: Mutex<Vec<SassModulesError>>,
}

impl ImporterFs {
    pub fn new(entry: PathBuf, entry_source: String, callback: ImportCallback) -> Self {
        Self {
            entry,
            entry_source,
            callback,
            loaded: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Rewrite the quoted `@import` targets of `source` to resolved paths
    pub fn rewrite_imports(&self, source: &str, importer: &Path) -> String {
        IMPORT_STATEMENT_RE
            .replace_all(source, |statement: &Captures<'_>| {
                let targets = QUOTED_RE.replace_all(&statement[1], |quoted: &Captures<'_>| {
                    let (quote, specifier) = match (quoted.get(1), quoted.get(2)) {
                        (Some(single), _) => ('\'', single.as_str()),
                        (None, Some(double)) => ('"', double.as_str()),
                        (None, None) => return quoted[0].to_string(),
                    };
                    match self.resolve_target(specifier, importer) {
                        Some(target) => format!("{quote}{target}{quote}"),
                        None => quoted[0].to_string(),
                    }
                });
                format!("@import {}", targets)
            })
            .into_owned()
    }

    fn resolve_target(&self, specifier: &str, importer: &Path) -> Option<String> {
        if is_plain_css_import(specifier) {
            return None;
        }

        match self.callback.resolve(specifier, importer) {
            Ok(resolution) => {
                let mut target = resolution.file;
                if let Some(contents) = resolution.contents {
                    self.loaded.lock().insert(target.clone(), contents);
                }
                // A `.css` target is only inlined when written without its extension
                if target.extension().is_some_and(|ext| ext == "css") {
                    target.set_extension("");
                }
                Some(target.to_string_lossy().replace('\\', "/"))
            }
            Err(e) => {
                Logger::debug(&format!("Leaving '{}' to the compiler: {}", specifier, e));
                self.failures.lock().push(e);
                None
            }
        }
    }

    /// Resolver errors that explain a compiler failure with `message`
    pub fn failures_for(&self, message: &str) -> Vec<SassModulesError> {
        self.failures
            .lock()
            .drain(..)
            .filter(|failure| match failure {
                SassModulesError::Unresolved { specifier, .. } => message.contains(specifier.as_str()),
                _ => true,
            })
            .collect()
    }

    fn source_of(&self, path: &Path) -> io::Result<String> {
        if path == self.entry {
            return Ok(self.entry_source.clone());
        }
        let loaded = self.loaded.lock().get(path).cloned();
        match loaded {
            Some(contents) => Ok(contents),
            None => std::fs::read_to_string(path),
        }
    }
}

impl Debug for ImporterFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImporterFs")
            .field("entry", &self.entry)
            .field("callback", &self.callback)
            .finish()
    }
}

impl grass::Fs for ImporterFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path == self.entry || self.loaded.lock().contains_key(path) || path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let source = self.source_of(path)?;
        // Plain CSS keeps its `@import` rules as written
        if path.extension().is_some_and(|ext| ext == "css") {
            return Ok(source.into_bytes());
        }
        Ok(self.rewrite_imports(&source, path).into_bytes())
    }
}

/// Imports grass emits as plain CSS instead of loading
fn is_plain_css_import(specifier: &str) -> bool {
    specifier.ends_with(".css")
        || specifier.starts_with("http://")
        || specifier.starts_with("https://")
        || specifier.starts_with("//")
}

/// Default stylesheet compiler backed by grass
#[derive(Debug, Clone, Default)]
pub struct GrassCompiler;

impl GrassCompiler {
    pub fn new() -> Self {
        Self
    }

    fn compile_blocking(request: CompileRequest, callback: ImportCallback) -> Result<CompiledCss> {
        let _timer = Timer::start(&format!("Compiling {}", request.id));

        let fs = ImporterFs::new(request.file.clone(), request.source.clone(), callback);
        let style = match request.options.output_style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        };

        let options = grass::Options::default()
            .fs(&fs)
            .load_paths(&request.include_paths)
            .style(style)
            .quiet(request.options.quiet);

        match grass::from_path(&request.file, &options) {
            Ok(css) => {
                Logger::debug(&format!(
                    "Compiled {} -> {} bytes",
                    request.id,
                    css.len()
                ));
                Ok(CompiledCss { css, map: None })
            }
            Err(e) => {
                let mut message = e.to_string();
                for failure in fs.failures_for(&message) {
                    message.push_str(&format!("\n  caused by: {}", failure));
                }
                let context = ErrorContext::new().with_file(request.file.clone());
                Err(SassModulesError::compile_with_context(
                    &request.id,
                    message,
                    context,
                ))
            }
        }
    }
}

#[async_trait]
impl StyleCompiler for GrassCompiler {
    async fn compile(&self, request: CompileRequest, importer: ImportCallback) -> Result<CompiledCss> {
        tokio::task::spawn_blocking(move || Self::compile_blocking(request, importer))
            .await
            .map_err(|e| SassModulesError::Other(format!("compiler task failed: {}", e)))?
    }
}

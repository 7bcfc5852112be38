use crate::core::context::{BuildContext, IncludePaths};
use crate::core::models::*;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Import resolution interface.
///
/// Synchronous because the compiler calls it from inside its own
/// filesystem callback.
pub trait Importer: Send + Sync {
    /// Resolve `specifier` as written in `importer` to a file on disk.
    ///
    /// Bare package lookups record their package root in `include_paths`.
    fn resolve(
        &self,
        specifier: &str,
        importer: &Path,
        include_paths: &IncludePaths,
        mode: ResolveMode,
    ) -> Result<Resolution>;
}

/// An `Importer` bound to the build it runs in, handed to the compiler
/// so nested imports resolve the same way top-level ones do.
#[derive(Clone)]
pub struct ImportCallback {
    importer: Arc<dyn Importer>,
    context: Arc<BuildContext>,
}

impl ImportCallback {
    pub fn new(importer: Arc<dyn Importer>, context: Arc<BuildContext>) -> Self {
        Self { importer, context }
    }

    /// Resolve and read an import on behalf of the compiler
    pub fn resolve(&self, specifier: &str, importer: &Path) -> Result<Resolution> {
        self.importer.resolve(
            specifier,
            importer,
            self.context.include_paths(),
            ResolveMode::WithContents,
        )
    }
}

impl std::fmt::Debug for ImportCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportCallback")
            .field("importer", &"<Importer>")
            .field("include_paths", &self.context.include_paths().len())
            .finish()
    }
}

/// Stylesheet compiler interface
#[async_trait]
pub trait StyleCompiler: Send + Sync {
    async fn compile(&self, request: CompileRequest, importer: ImportCallback) -> Result<CompiledCss>;
}

/// Post-processing applied to compiled CSS
#[async_trait]
pub trait CssPostProcessor: Send + Sync {
    async fn process(&self, css: String, path: &Path) -> Result<String>;
}

/// Post-processor that returns its input
pub struct IdentityProcessor;

#[async_trait]
impl CssPostProcessor for IdentityProcessor {
    async fn process(&self, css: String, _path: &Path) -> Result<String> {
        Ok(css)
    }
}

/// Adapts a synchronous closure into a [`CssPostProcessor`]
pub struct SyncProcessor<F>(pub F);

#[async_trait]
impl<F> CssPostProcessor for SyncProcessor<F>
where
    F: Fn(String) -> Result<String> + Send + Sync,
{
    async fn process(&self, css: String, _path: &Path) -> Result<String> {
        (self.0)(css)
    }
}

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<String>;
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
    fn file_exists(&self, path: &Path) -> bool;
}

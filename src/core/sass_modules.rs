// Stylesheet-as-module plugin: per-module transform plus optional
// single-file aggregation at the end of the bundle.

use crate::core::codegen::{empty_source_map, export_module, insert_module};
use crate::core::context::BuildContext;
use crate::core::filter::ModuleFilter;
use crate::core::imports::extract_imports;
use crate::core::interfaces::*;
use crate::core::models::*;
use crate::core::plugin::Plugin;
use crate::infrastructure::{GrassCompiler, NodeImporter, TokioFileSystemService};
use crate::utils::{Logger, Result, Timer};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Plugin configuration
#[derive(Clone, Default)]
pub struct SassModulesOptions {
    /// Globs of module ids to handle (default `**/*.scss`, `**/*.sass`)
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Replaces the default node-style import resolver
    pub importer: Option<Arc<dyn Importer>>,
    /// Applied to compiled CSS before it is emitted (identity by default)
    pub processor: Option<Arc<dyn CssPostProcessor>>,
    /// Inject a `<style>` element instead of exporting the CSS
    pub insert: bool,
    /// Passed through to the compiler; `out_file` enables aggregation
    pub options: CompilerOptions,
    /// Replaces the default grass compiler
    pub compiler: Option<Arc<dyn StyleCompiler>>,
    pub fs: Option<Arc<dyn FileSystemService>>,
}

pub struct SassModulesPlugin {
    filter: ModuleFilter,
    importer: Arc<dyn Importer>,
    processor: Arc<dyn CssPostProcessor>,
    compiler: Arc<dyn StyleCompiler>,
    fs: Arc<dyn FileSystemService>,
    insert: bool,
    options: CompilerOptions,
    context: RwLock<Arc<BuildContext>>,
}

impl SassModulesPlugin {
    pub fn new(options: SassModulesOptions) -> Result<Self> {
        let filter = ModuleFilter::new(&options.include, &options.exclude)?;
        let context = BuildContext::new(&options.options.include_paths);

        Ok(Self {
            filter,
            importer: options
                .importer
                .unwrap_or_else(|| Arc::new(NodeImporter::new())),
            processor: options
                .processor
                .unwrap_or_else(|| Arc::new(IdentityProcessor)),
            compiler: options
                .compiler
                .unwrap_or_else(|| Arc::new(GrassCompiler::new())),
            fs: options
                .fs
                .unwrap_or_else(|| Arc::new(TokioFileSystemService)),
            insert: options.insert,
            options: options.options,
            context: RwLock::new(Arc::new(context)),
        })
    }

    /// State of the build currently in progress
    pub fn context(&self) -> Arc<BuildContext> {
        self.context.read().clone()
    }

    pub fn handles(&self, id: &str) -> bool {
        self.filter.matches(id)
    }

    /// Resolve an import the same way the transform hook does
    pub fn resolve(&self, specifier: &str, importer: &Path, mode: ResolveMode) -> Result<Resolution> {
        let ctx = self.context();
        self.importer
            .resolve(specifier, importer, ctx.include_paths(), mode)
    }

    /// Compile one stylesheet module into its JS replacement
    pub async fn transform_stylesheet(&self, code: &str, id: &str) -> Result<TransformOutput> {
        let ctx = self.context();
        let path = Path::new(id);
        Logger::transforming(id);
        ctx.mark_seen(id);

        let mut dependencies: Vec<String> = Vec::new();
        for specifier in extract_imports(code) {
            let resolution =
                self.importer
                    .resolve(&specifier, path, ctx.include_paths(), ResolveMode::PathOnly)?;
            let dep = resolution.file.to_string_lossy().into_owned();
            if !dependencies.contains(&dep) {
                dependencies.push(dep);
            }
        }

        // Claims must land before the first await below, so that sibling
        // transforms scheduled concurrently observe them.
        for dep in &dependencies {
            ctx.claim(dep);
        }

        if ctx.take_claim(id) || ctx.is_exported(id) {
            Logger::skipped_duplicate(id);
            return Ok(TransformOutput {
                code: export_module(&dependencies, ""),
                map: empty_source_map(),
            });
        }
        ctx.mark_exported(id);

        let request = CompileRequest {
            id: id.to_string(),
            file: path.to_path_buf(),
            source: code.to_string(),
            include_paths: ctx.include_paths().roots(),
            options: self.options.clone(),
        };
        let callback = ImportCallback::new(self.importer.clone(), ctx.clone());
        let compiled = self.compiler.compile(request, callback).await?;
        ctx.cache_css(id, compiled.css.clone());

        let code = if self.insert {
            let css = self.processor.process(compiled.css, path).await?;
            insert_module(&dependencies, &css)
        } else if self.options.out_file.is_some() {
            // CSS is emitted once, by the aggregation step
            export_module(&dependencies, "")
        } else {
            let css = self.processor.process(compiled.css, path).await?;
            export_module(&dependencies, &css)
        };

        Ok(TransformOutput {
            code,
            map: compiled.map.unwrap_or_else(empty_source_map),
        })
    }

    /// Stylesheets to combine, in discovery order
    fn aggregation_order(&self, ctx: &BuildContext, graph: &ModuleGraph) -> Vec<String> {
        let mut order: Vec<String> = ctx
            .exported()
            .into_iter()
            .filter(|id| graph.is_empty() || graph.contains(id))
            .collect();

        // Stylesheets the host loaded without running our transform
        for module in graph.modules() {
            if self.handles(&module.id) {
                continue;
            }
            for dep in &module.dependencies {
                if self.handles(dep) && !ctx.was_seen(dep) && !order.contains(dep) {
                    order.push(dep.clone());
                }
            }
        }

        order
    }

    /// Fill the aggregate buffer with every exported stylesheet's CSS
    pub async fn aggregate(&self, graph: &ModuleGraph) -> Result<()> {
        let _timer = Timer::start("Aggregating stylesheets");
        let ctx = self.context();
        let mut parts = Vec::new();

        for id in self.aggregation_order(&ctx, graph) {
            let path = Path::new(&id);
            let css = match ctx.cached_css(&id) {
                Some(css) => css,
                None => {
                    let source = self.fs.read_file(path).await?;
                    let request = CompileRequest {
                        id: id.clone(),
                        file: path.to_path_buf(),
                        source,
                        include_paths: ctx.include_paths().roots(),
                        options: self.options.clone(),
                    };
                    let callback = ImportCallback::new(self.importer.clone(), ctx.clone());
                    let compiled = self.compiler.compile(request, callback).await?;
                    ctx.cache_css(&id, compiled.css.clone());
                    compiled.css
                }
            };
            parts.push(self.processor.process(css, path).await?);
        }

        Logger::debug(&format!("Aggregated {} stylesheets", parts.len()));
        ctx.set_aggregate(parts.join("\n"));
        Ok(())
    }
}

#[async_trait]
impl Plugin for SassModulesPlugin {
    fn name(&self) -> &str {
        "sass-modules"
    }

    async fn build_start(&self) -> Result<()> {
        *self.context.write() = Arc::new(BuildContext::new(&self.options.include_paths));
        Ok(())
    }

    async fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        if !self.handles(id) {
            return Ok(None);
        }
        self.transform_stylesheet(code, id).await.map(Some)
    }

    async fn generate_bundle(&self, graph: &ModuleGraph) -> Result<()> {
        if self.options.out_file.is_none() {
            return Ok(());
        }
        self.aggregate(graph).await
    }

    async fn write_bundle(&self) -> Result<()> {
        let Some(out_file) = &self.options.out_file else {
            return Ok(());
        };

        let css = self.context().take_aggregate();
        if css.is_empty() {
            return Ok(());
        }

        self.fs.write_file(out_file, &css).await?;
        Logger::aggregate_written(out_file, css.len());
        Ok(())
    }
}

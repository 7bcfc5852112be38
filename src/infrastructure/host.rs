// Minimal bundle host: loads entry modules, runs the plugin transform chain,
// follows the import edges of the transformed code and drives the
// end-of-bundle hooks.

use crate::core::imports::extract_js_imports;
use crate::core::interfaces::FileSystemService;
use crate::core::models::{ModuleGraph, ModuleInfo};
use crate::core::plugin::PluginManager;
use crate::utils::{Logger, Result, SassModulesError, Timer};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub struct BundleHost {
    plugins: PluginManager,
    fs: Arc<dyn FileSystemService>,
    root: PathBuf,
    outdir: Option<PathBuf>,
}

impl BundleHost {
    pub fn new(plugins: PluginManager, fs: Arc<dyn FileSystemService>, root: PathBuf) -> Self {
        Self {
            plugins,
            fs,
            root,
            outdir: None,
        }
    }

    /// Write every transformed module below `outdir`
    pub fn with_outdir(mut self, outdir: PathBuf) -> Self {
        self.outdir = Some(outdir);
        self
    }

    /// Run one full build starting from `entries`
    pub async fn build(&self, entries: &[PathBuf]) -> Result<ModuleGraph> {
        let started = Instant::now();
        self.plugins.build_start().await?;

        let entry_ids = entries
            .iter()
            .map(|entry| {
                let path = if entry.is_absolute() {
                    entry.clone()
                } else {
                    self.root.join(entry)
                };
                Ok(std::fs::canonicalize(&path)?.to_string_lossy().into_owned())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut graph = ModuleGraph::new();
        let mut visited = HashSet::new();
        self.load(entry_ids, true, &mut graph, &mut visited).await?;

        self.plugins.generate_bundle(&graph).await?;

        if let Some(outdir) = &self.outdir {
            self.write_modules(&graph, outdir).await?;
        }
        self.plugins.write_bundle().await?;

        Logger::build_complete(graph.len(), started.elapsed());

        Ok(graph)
    }

    /// Transform a group of sibling modules concurrently, then descend into
    /// each one's dependencies in order.
    fn load<'a>(
        &'a self,
        ids: Vec<String>,
        is_entry: bool,
        graph: &'a mut ModuleGraph,
        visited: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let fresh: Vec<String> = ids
                .into_iter()
                .filter(|id| visited.insert(id.clone()))
                .collect();
            if fresh.is_empty() {
                return Ok(());
            }

            // Sources are read up front so that the transforms below start in
            // sibling order; plugins record discovery order before their first await.
            let sources =
                try_join_all(fresh.iter().map(|id| self.fs.read_file(Path::new(id)))).await?;
            let modules = try_join_all(
                fresh
                    .iter()
                    .zip(sources)
                    .map(|(id, source)| self.transform_module(id, source, is_entry)),
            )
            .await?;

            for module in &modules {
                graph.add_module(module.clone());
            }
            for module in modules {
                self.load(module.dependencies, false, graph, visited).await?;
            }
            Ok(())
        }
        .boxed()
    }

    async fn transform_module(&self, id: &str, source: String, is_entry: bool) -> Result<ModuleInfo> {
        let _timer = Timer::start(&format!("Transforming {}", id));
        let path = Path::new(id);
        let (code, map) = self.plugins.transform(source, id).await?;

        let mut dependencies = Vec::new();
        for specifier in extract_js_imports(&code) {
            match resolve_js_import(&specifier, path)? {
                Some(dep) => {
                    if !dependencies.contains(&dep) {
                        dependencies.push(dep);
                    }
                }
                None => Logger::debug(&format!("Treating '{}' as external", specifier)),
            }
        }

        Ok(ModuleInfo {
            id: id.to_string(),
            code,
            map,
            dependencies,
            is_entry,
        })
    }

    async fn write_modules(&self, graph: &ModuleGraph, outdir: &Path) -> Result<()> {
        for module in graph.modules() {
            let path = Path::new(&module.id);
            let relative = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(path.file_name().unwrap_or_default()));

            let mut target = outdir.join(relative).into_os_string();
            if !module.id.ends_with(".js") {
                target.push(".js");
            }
            let target = PathBuf::from(target);

            self.fs.write_file(&target, &module.code).await?;
            if let Some(map) = &module.map {
                let mut map_path = target.clone().into_os_string();
                map_path.push(".map");
                self.fs.write_file(Path::new(&map_path), map).await?;
            }
        }
        Logger::info(&format!(
            "📝 Wrote {} modules to {}",
            graph.len(),
            outdir.display()
        ));
        Ok(())
    }
}

/// Relative and absolute specifiers become module ids; bare ones are external
fn resolve_js_import(specifier: &str, importer: &Path) -> Result<Option<String>> {
    let candidate = if Path::new(specifier).is_absolute() {
        PathBuf::from(specifier)
    } else if specifier.starts_with("./") || specifier.starts_with("../") {
        importer
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(specifier)
    } else {
        return Ok(None);
    };

    let resolved = std::fs::canonicalize(&candidate)
        .map_err(|_| SassModulesError::unresolved(specifier, importer))?;
    Ok(Some(resolved.to_string_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::TokioFileSystemService;
    use std::fs;

    #[test]
    fn test_resolve_js_import() {
        let temp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        fs::write(root.join("a.scss"), "").unwrap();
        let importer = root.join("main.js");

        assert_eq!(
            resolve_js_import("./a.scss", &importer).unwrap(),
            Some(root.join("a.scss").to_string_lossy().into_owned())
        );
        assert_eq!(resolve_js_import("react", &importer).unwrap(), None);
        assert!(resolve_js_import("./missing.js", &importer).is_err());
    }

    #[tokio::test]
    async fn test_host_without_plugins_follows_js_imports() {
        let temp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        fs::write(root.join("main.js"), "import './util.js';\nimport 'lodash';\n").unwrap();
        fs::write(root.join("util.js"), "export const x = 1;\n").unwrap();

        let host = BundleHost::new(PluginManager::new(), Arc::new(TokioFileSystemService), root.clone())
            .with_outdir(root.join("dist"));
        let graph = host.build(&[PathBuf::from("main.js")]).await.unwrap();

        assert_eq!(graph.len(), 2);
        let main = graph.get(&root.join("main.js").to_string_lossy()).unwrap();
        assert!(main.is_entry);
        assert_eq!(main.dependencies, vec![root.join("util.js").to_string_lossy().into_owned()]);
        assert!(root.join("dist/util.js").exists());
    }
}

use crate::core::context::IncludePaths;
use crate::core::interfaces::Importer;
use crate::core::models::*;
use crate::infrastructure::node_resolver::NodeModuleResolver;
use crate::utils::{Logger, Result, SassModulesError};
use std::path::{Path, PathBuf};

/// Default import resolver: relative paths, partials, omitted extensions
/// and `node_modules` packages (with or without a `~` prefix).
#[derive(Debug, Default)]
pub struct NodeImporter {
    packages: NodeModuleResolver,
}

impl NodeImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// First existing candidate for a filesystem path
    fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        alternatives(&path.to_string_lossy())
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
    }

    fn resolve_package(
        &self,
        specifier: &str,
        base_dir: &Path,
        include_paths: &IncludePaths,
    ) -> Option<PathBuf> {
        let hit = alternatives(specifier)
            .iter()
            .find_map(|alt| self.packages.resolve(alt, base_dir))
            .or_else(|| self.packages.resolve(specifier, base_dir))?;

        include_paths.insert(IncludePath::new(hit.node_modules));
        Some(hit.file)
    }
}

impl Importer for NodeImporter {
    fn resolve(
        &self,
        specifier: &str,
        importer: &Path,
        include_paths: &IncludePaths,
        mode: ResolveMode,
    ) -> Result<Resolution> {
        let base_dir = importer.parent().unwrap_or_else(|| Path::new("."));

        let found = match ImportSpecifier::parse(specifier) {
            ImportSpecifier::Path(path) => self.resolve_path(&base_dir.join(path)),
            ImportSpecifier::Package(module) => {
                self.resolve_package(&module, base_dir, include_paths)
            }
            ImportSpecifier::Unqualified(module) => self
                .resolve_path(&base_dir.join(&module))
                .or_else(|| self.resolve_package(&module, base_dir, include_paths)),
        };

        let file = found.ok_or_else(|| SassModulesError::unresolved(specifier, importer))?;
        let file = std::fs::canonicalize(&file).unwrap_or(file);

        Logger::debug(&format!("Resolved '{}' -> {}", specifier, file.display()));

        let contents = match mode {
            ResolveMode::PathOnly => None,
            ResolveMode::WithContents => Some(std::fs::read_to_string(&file)?),
        };

        Ok(Resolution { file, contents })
    }
}

/// Candidate files for a specifier, in probing order.
///
/// A specifier with a stylesheet extension is its own single candidate.
/// Otherwise each extension is tried plain first, then as a `_` partial.
pub fn alternatives(specifier: &str) -> Vec<String> {
    if has_style_extension(Path::new(specifier)) {
        return vec![specifier.to_string()];
    }

    let (dir, base) = match specifier.rfind('/') {
        Some(i) => (&specifier[..=i], &specifier[i + 1..]),
        None => ("", specifier),
    };

    let mut candidates = Vec::with_capacity(STYLE_EXTENSIONS.len() * 2);
    for ext in STYLE_EXTENSIONS {
        candidates.push(format!("{}{}.{}", dir, base, ext));
        if !base.is_empty() && !base.starts_with('_') {
            candidates.push(format!("{}_{}.{}", dir, base, ext));
        }
    }
    candidates
}

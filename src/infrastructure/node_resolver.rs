use crate::core::models::{has_style_extension, STYLE_EXTENSIONS};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The package.json fields that matter for stylesheet entry points
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub sass: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
}

/// A file found inside a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHit {
    pub file: PathBuf,
    /// The `node_modules` directory the package was found in
    pub node_modules: PathBuf,
}

/// Node.js-style package lookup, restricted to stylesheets
#[derive(Debug, Default)]
pub struct NodeModuleResolver {
    /// Cache of package.json files
    package_cache: Mutex<HashMap<PathBuf, PackageJson>>,
}

impl NodeModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `specifier` (`pkg`, `pkg/sub/path`, `@scope/pkg/sub`) walking
    /// up from `base_dir` through every ancestor `node_modules` directory.
    ///
    /// A subpath must name an existing file exactly; a bare package name
    /// resolves to the package's stylesheet entry point.
    pub fn resolve(&self, specifier: &str, base_dir: &Path) -> Option<PackageHit> {
        let (pkg_name, subpath) = parse_package_specifier(specifier);
        if pkg_name.is_empty() {
            return None;
        }

        let mut current_dir = Some(base_dir);
        while let Some(dir) = current_dir {
            let node_modules = dir.join("node_modules");
            let package_dir = node_modules.join(&pkg_name);

            if package_dir.is_dir() {
                let found = match &subpath {
                    Some(sub) => {
                        let full = package_dir.join(sub);
                        full.is_file().then_some(full)
                    }
                    None => self.resolve_package_entry(&package_dir),
                };
                if let Some(file) = found {
                    return Some(PackageHit { file, node_modules });
                }
            }

            current_dir = dir.parent();
        }

        None
    }

    /// Entry point of a package: `sass`, `style`, a stylesheet `main`, then index files
    fn resolve_package_entry(&self, package_dir: &Path) -> Option<PathBuf> {
        let package_json_path = package_dir.join("package.json");
        if let Some(pkg) = self.read_package_json(&package_json_path) {
            let fields = [pkg.sass.as_deref(), pkg.style.as_deref(), pkg.main.as_deref()];
            for entry in fields.into_iter().flatten() {
                let candidate = package_dir.join(entry);
                if has_style_extension(&candidate) && candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        for ext in STYLE_EXTENSIONS {
            for name in ["index", "_index"] {
                let candidate = package_dir.join(format!("{}.{}", name, ext));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        None
    }

    /// Read and cache package.json
    fn read_package_json(&self, path: &Path) -> Option<PackageJson> {
        if let Some(cached) = self.package_cache.lock().get(path) {
            return Some(cached.clone());
        }

        let content = std::fs::read_to_string(path).ok()?;
        let package: PackageJson = serde_json::from_str(&content).ok()?;

        self.package_cache
            .lock()
            .insert(path.to_path_buf(), package.clone());

        Some(package)
    }
}

/// Parse package specifier into package name and subpath
pub fn parse_package_specifier(specifier: &str) -> (String, Option<String>) {
    // Scoped packages like @org/theme
    if let Some(rest) = specifier.strip_prefix('@') {
        if let Some(slash_pos) = rest.find('/') {
            let after_scope = &rest[slash_pos + 1..];
            return match after_scope.find('/') {
                Some(pos) => {
                    let split = 1 + slash_pos + 1 + pos;
                    (
                        specifier[..split].to_string(),
                        Some(specifier[split + 1..].to_string()),
                    )
                }
                None => (specifier.to_string(), None),
            };
        }
        return (specifier.to_string(), None);
    }

    match specifier.find('/') {
        Some(slash_pos) => (
            specifier[..slash_pos].to_string(),
            Some(specifier[slash_pos + 1..].to_string()),
        ),
        None => (specifier.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_package_specifier() {
        assert_eq!(parse_package_specifier("pkg"), ("pkg".to_string(), None));
        assert_eq!(
            parse_package_specifier("pkg/scss/grid.scss"),
            ("pkg".to_string(), Some("scss/grid.scss".to_string()))
        );
        assert_eq!(
            parse_package_specifier("@org/theme"),
            ("@org/theme".to_string(), None)
        );
        assert_eq!(
            parse_package_specifier("@org/theme/_colors.scss"),
            ("@org/theme".to_string(), Some("_colors.scss".to_string()))
        );
    }

    #[test]
    fn test_resolves_subpath_from_ancestor_node_modules() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let pkg = root.join("node_modules/theme/scss");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("_colors.scss"), "$c: red;").unwrap();
        let nested = root.join("src/components");
        fs::create_dir_all(&nested).unwrap();

        let resolver = NodeModuleResolver::new();
        let hit = resolver.resolve("theme/scss/_colors.scss", &nested).unwrap();
        assert_eq!(hit.file, pkg.join("_colors.scss"));
        assert_eq!(hit.node_modules, root.join("node_modules"));

        assert!(resolver.resolve("theme/scss/missing.scss", &nested).is_none());
    }

    #[test]
    fn test_bare_package_uses_style_field() {
        let temp = tempfile::tempdir().unwrap();
        let pkg = temp.path().join("node_modules/@org/theme");
        fs::create_dir_all(pkg.join("dist")).unwrap();
        fs::write(
            pkg.join("package.json"),
            r#"{"name": "@org/theme", "main": "index.js", "style": "dist/theme.css"}"#,
        )
        .unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();
        fs::write(pkg.join("dist/theme.css"), "a{}").unwrap();

        let resolver = NodeModuleResolver::new();
        let hit = resolver.resolve("@org/theme", temp.path()).unwrap();
        assert_eq!(hit.file, pkg.join("dist/theme.css"));
    }

    #[test]
    fn test_bare_package_falls_back_to_index() {
        let temp = tempfile::tempdir().unwrap();
        let pkg = temp.path().join("node_modules/grid");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("_index.scss"), "").unwrap();

        let resolver = NodeModuleResolver::new();
        let hit = resolver.resolve("grid", temp.path()).unwrap();
        assert_eq!(hit.file, pkg.join("_index.scss"));
    }
}

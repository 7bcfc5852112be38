use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stylesheet extensions, in the order unqualified imports are probed
pub const STYLE_EXTENSIONS: [&str; 3] = ["scss", "sass", "css"];

/// How an import specifier written in source should be looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// `./x`, `../x` or an absolute path
    Path(String),
    /// `~pkg/x`, with the tilde already stripped
    Package(String),
    /// Anything else: tried relative to the importer first, then as a package
    Unqualified(String),
}

impl ImportSpecifier {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("./") || raw.starts_with("../") || Path::new(raw).is_absolute() {
            ImportSpecifier::Path(raw.to_string())
        } else if let Some(stripped) = raw.strip_prefix('~') {
            ImportSpecifier::Package(stripped.to_string())
        } else {
            ImportSpecifier::Unqualified(raw.to_string())
        }
    }
}

/// Whether a resolution should also read the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Top-level extraction only needs the canonical path
    PathOnly,
    /// Compiler callback needs the text as well
    WithContents,
}

/// Outcome of a successful import resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub file: PathBuf,
    pub contents: Option<String>,
}

/// Directory root the compiler may search for imports that are not relative
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncludePath {
    pub root: PathBuf,
}

impl IncludePath {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Glob form, `<root>/**/*`
    pub fn glob(&self) -> String {
        self.root.join("**/*").to_string_lossy().into_owned()
    }
}

impl fmt::Display for IncludePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

/// Options passed through to the stylesheet compiler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub output_style: OutputStyle,
    /// Extra include paths seeded into every build
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Single combined output file; enables aggregation mode
    #[serde(default)]
    pub out_file: Option<PathBuf>,
    /// Silence `@warn` and `@debug` output
    #[serde(default)]
    pub quiet: bool,
}

/// Everything the compiler needs for one stylesheet
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub id: String,
    pub file: PathBuf,
    pub source: String,
    pub include_paths: Vec<PathBuf>,
    pub options: CompilerOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCss {
    pub css: String,
    pub map: Option<String>,
}

/// Replacement module body handed back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    pub map: String,
}

/// A module as the host finally sees it
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub id: String,
    pub code: String,
    pub map: Option<String>,
    pub dependencies: Vec<String>,
    pub is_entry: bool,
}

/// Final dependency graph exposed to the end-of-bundle hook.
/// Modules are kept in load order.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<ModuleInfo>,
    index: HashMap<String, usize>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: ModuleInfo) {
        if let Some(&i) = self.index.get(&module.id) {
            self.modules[i] = module;
        } else {
            self.index.insert(module.id.clone(), self.modules.len());
            self.modules.push(module);
        }
    }

    pub fn get(&self, id: &str) -> Option<&ModuleInfo> {
        self.index.get(id).map(|&i| &self.modules[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

pub fn has_style_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| STYLE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

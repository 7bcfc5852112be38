// Per-build mutable state shared by the resolver and the transform hook.
// Locks are only held for short synchronous sections, never across an await.

use crate::core::models::IncludePath;
use crate::utils::Logger;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;

/// Append-only set of include path roots, in discovery order
#[derive(Debug, Default)]
pub struct IncludePaths {
    entries: Mutex<Vec<IncludePath>>,
}

impl IncludePaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(roots: &[PathBuf]) -> Self {
        let paths = Self::new();
        for root in roots {
            paths.insert(IncludePath::new(root.clone()));
        }
        paths
    }

    /// Returns true if the path was not yet present
    pub fn insert(&self, path: IncludePath) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains(&path) {
            return false;
        }
        Logger::include_path_added(&path.glob());
        entries.push(path);
        true
    }

    pub fn snapshot(&self) -> Vec<IncludePath> {
        self.entries.lock().clone()
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.entries.lock().iter().map(|p| p.root.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// State that lives for exactly one build invocation
#[derive(Debug, Default)]
pub struct BuildContext {
    include_paths: IncludePaths,
    active: Mutex<HashSet<String>>,
    exported: Mutex<Vec<String>>,
    seen: Mutex<HashSet<String>>,
    compiled: DashMap<String, String>,
    aggregate: Mutex<String>,
}

impl BuildContext {
    pub fn new(seed_include_paths: &[PathBuf]) -> Self {
        Self {
            include_paths: IncludePaths::with_seed(seed_include_paths),
            ..Default::default()
        }
    }

    pub fn include_paths(&self) -> &IncludePaths {
        &self.include_paths
    }

    /// Mark a dependency as pulled in by an importer that compiles it inline
    pub fn claim(&self, id: &str) {
        self.active.lock().insert(id.to_string());
    }

    /// Removes the id from the active set, returning whether it was claimed
    pub fn take_claim(&self, id: &str) -> bool {
        self.active.lock().remove(id)
    }

    /// Records a module this build compiles on its own.
    /// Returns false if it was already recorded.
    pub fn mark_exported(&self, id: &str) -> bool {
        let mut exported = self.exported.lock();
        if exported.iter().any(|e| e == id) {
            return false;
        }
        exported.push(id.to_string());
        true
    }

    pub fn is_exported(&self, id: &str) -> bool {
        self.exported.lock().iter().any(|e| e == id)
    }

    pub fn exported(&self) -> Vec<String> {
        self.exported.lock().clone()
    }

    /// Records that the transform hook handled this module in this build
    pub fn mark_seen(&self, id: &str) {
        self.seen.lock().insert(id.to_string());
    }

    pub fn was_seen(&self, id: &str) -> bool {
        self.seen.lock().contains(id)
    }

    pub fn cache_css(&self, id: &str, css: String) {
        self.compiled.insert(id.to_string(), css);
    }

    pub fn cached_css(&self, id: &str) -> Option<String> {
        self.compiled.get(id).map(|entry| entry.value().clone())
    }

    pub fn set_aggregate(&self, css: String) {
        *self.aggregate.lock() = css;
    }

    pub fn aggregate(&self) -> String {
        self.aggregate.lock().clone()
    }

    /// Hands the aggregate buffer over, leaving it empty
    pub fn take_aggregate(&self) -> String {
        std::mem::take(&mut *self.aggregate.lock())
    }
}

// Plugin system for the bundle host
// Hooks follow the host's two-phase lifecycle: per-module transform, then whole-bundle

use crate::core::models::{ModuleGraph, TransformOutput};
use crate::utils::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Main plugin trait that all plugins must implement
///
/// Plugins can hook into various stages of the build process:
/// - Build lifecycle (start, bundle generated, write)
/// - Per-module transformation
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin
    fn name(&self) -> &str;

    /// Called at the start of every build, before any module is transformed
    async fn build_start(&self) -> Result<()> {
        Ok(())
    }

    /// Transform module source
    ///
    /// Return `Some(output)` to replace the module body,
    /// or `None` to pass it through unchanged.
    ///
    /// # Arguments
    /// * `code` - Current module source
    /// * `id` - Module id (absolute file path)
    async fn transform(&self, _code: &str, _id: &str) -> Result<Option<TransformOutput>> {
        Ok(None)
    }

    /// Called once all modules are transformed, with the final graph
    async fn generate_bundle(&self, _graph: &ModuleGraph) -> Result<()> {
        Ok(())
    }

    /// Called after the host wrote its output
    async fn write_bundle(&self) -> Result<()> {
        Ok(())
    }
}

/// Manages plugin registration and execution
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub async fn build_start(&self) -> Result<()> {
        for plugin in &self.plugins {
            plugin.build_start().await?;
        }
        Ok(())
    }

    /// Execute transform hooks for all plugins
    ///
    /// Plugins are executed in registration order.
    /// Each plugin receives the output of the previous plugin; the last
    /// source map produced wins.
    pub async fn transform(&self, code: String, id: &str) -> Result<(String, Option<String>)> {
        let mut code = code;
        let mut map = None;
        for plugin in &self.plugins {
            if let Some(output) = plugin.transform(&code, id).await? {
                code = output.code;
                map = Some(output.map);
            }
        }
        Ok((code, map))
    }

    pub async fn generate_bundle(&self, graph: &ModuleGraph) -> Result<()> {
        for plugin in &self.plugins {
            plugin.generate_bundle(graph).await?;
        }
        Ok(())
    }

    pub async fn write_bundle(&self) -> Result<()> {
        for plugin in &self.plugins {
            plugin.write_bundle().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UppercasePlugin;

    #[async_trait]
    impl Plugin for UppercasePlugin {
        fn name(&self) -> &str {
            "uppercase"
        }

        async fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
            if !id.ends_with(".txt") {
                return Ok(None);
            }
            Ok(Some(TransformOutput {
                code: code.to_uppercase(),
                map: "{}".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn test_plugin_manager_registration() {
        let mut manager = PluginManager::new();
        assert_eq!(manager.plugin_count(), 0);
        manager.register(Arc::new(UppercasePlugin));
        assert_eq!(manager.plugin_count(), 1);
    }

    #[tokio::test]
    async fn test_transform_chain() {
        let mut manager = PluginManager::new();
        manager.register(Arc::new(UppercasePlugin));

        let (code, map) = manager.transform("hello world".to_string(), "a.txt").await.unwrap();
        assert_eq!(code, "HELLO WORLD");
        assert_eq!(map.as_deref(), Some("{}"));

        let (code, map) = manager.transform("hello".to_string(), "a.js").await.unwrap();
        assert_eq!(code, "hello");
        assert!(map.is_none());
    }
}

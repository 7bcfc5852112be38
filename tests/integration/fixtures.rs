use sass_modules::core::plugin::PluginManager;
use sass_modules::infrastructure::{BundleHost, TokioFileSystemService};
use sass_modules::{SassModulesOptions, SassModulesPlugin};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A throwaway project directory
pub struct Project {
    _temp: tempfile::TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(temp.path()).unwrap();
        Self { _temp: temp, root }
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn id(&self, name: &str) -> String {
        self.root.join(name).to_string_lossy().into_owned()
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.root.join(name)).unwrap()
    }

    pub fn host(&self, plugin: Arc<SassModulesPlugin>) -> BundleHost {
        let mut plugins = PluginManager::new();
        plugins.register(plugin);
        BundleHost::new(plugins, Arc::new(TokioFileSystemService), self.root.clone())
            .with_outdir(self.root.join("dist"))
    }
}

pub fn plugin(options: SassModulesOptions) -> Arc<SassModulesPlugin> {
    Arc::new(SassModulesPlugin::new(options).unwrap())
}

pub fn entry(path: &Path) -> Vec<PathBuf> {
    vec![path.to_path_buf()]
}

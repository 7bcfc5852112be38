use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct Logger;

impl Logger {
    pub fn init() {
        // try_init so repeated initialisation (tests, embedding hosts) is harmless
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sass_modules=info")),
            )
            .with_target(false)
            .try_init();
    }

    pub fn build_start(root: &Path, outdir: &Path) {
        info!("🎨 sass-modules build");
        info!("═══════════════════════════════════════");
        info!("📁 Root: {}", root.display());
        info!("📦 Output: {}", outdir.display());
    }

    pub fn transforming(id: &str) {
        debug!("⚡ Transforming: {}", id);
    }

    pub fn skipped_duplicate(id: &str) {
        debug!("♻️  Already compiled by an importer, emitting edge only: {}", id);
    }

    pub fn include_path_added(glob: &str) {
        debug!("➕ Include path: {}", glob);
    }

    pub fn aggregate_written(path: &Path, bytes: usize) {
        info!("📦 Wrote {} ({} bytes)", path.display(), bytes);
    }

    pub fn build_complete(modules: usize, build_time: std::time::Duration) {
        info!("");
        info!("📊 Build Statistics:");
        info!("  • Modules in graph: {}", modules);
        info!("  • Build time: {:.2?}", build_time);
        info!("✅ Build completed successfully!");
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}

use crate::core::interfaces::FileSystemService;
use crate::utils::Result;
use std::path::Path;
use tokio::fs;

pub struct TokioFileSystemService;

#[async_trait::async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn read_file(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_directory(parent).await?;
            }
        }

        Ok(fs::write(path, content).await?)
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        Ok(fs::create_dir_all(path).await?)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

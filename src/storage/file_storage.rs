use crate::{error::Result, storage::Storage};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation, one JSON file per key
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    pub const DATA_DIR: &'static str = ".noteboard";

    /// Creates a FileStorage rooted at `<project_root>/.noteboard`
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self::at(project_root.as_ref().join(Self::DATA_DIR))
    }

    /// Creates a FileStorage that keeps its files directly in `dir`
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            root_path: dir.into(),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn slot_file(&self, key: &str) -> PathBuf {
        self.root_path.join(format!("{key}.json"))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.slot_file(key);

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(contents))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Write beside the target and rename so readers never see a torn file
        let file_path = self.slot_file(key);
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.slot_file(key);

        if file_path.exists() {
            fs::remove_file(file_path).await?;
        }
        Ok(())
    }
}

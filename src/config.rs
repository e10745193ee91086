use crate::error::{NoteboardError, Result};
use crate::persistence::PersistenceAdapter;
use crate::storage::{FileStorage, Storage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteboardConfig {
    #[serde(default)]
    pub board: BoardSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSettings {
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_color() -> String {
    "#ffffff".to_string()
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            default_color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    #[serde(default = "default_key")]
    pub key: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(FileStorage::DATA_DIR)
}

fn default_key() -> String {
    PersistenceAdapter::DEFAULT_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_data_path(),
            key: default_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

impl NoteboardConfig {
    pub const FILE_NAME: &'static str = "noteboard.toml";

    /// Loads the config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| NoteboardError::ConfigError(err.to_string()))
    }

    /// Directory holding board data, resolved against the project root
    pub fn data_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.storage.path)
    }

    /// Builds the configured storage backend
    pub fn open_storage(&self, project_root: &Path) -> Result<Arc<dyn Storage>> {
        let data_path = self.data_path(project_root);
        match self.storage.backend {
            StorageBackend::File => Ok(Arc::new(FileStorage::at(data_path))),
            #[cfg(feature = "sqlite-storage")]
            StorageBackend::Sqlite => {
                std::fs::create_dir_all(&data_path)?;
                let storage = crate::storage::SqliteStorage::new(data_path.join("noteboard.db"))?;
                Ok(Arc::new(storage))
            }
            #[cfg(not(feature = "sqlite-storage"))]
            StorageBackend::Sqlite => Err(NoteboardError::ConfigError(
                "sqlite backend requires the `sqlite-storage` feature".to_string(),
            )),
        }
    }

    /// Builds the persistence adapter for the configured backend and key
    pub fn persistence(&self, project_root: &Path) -> Result<PersistenceAdapter> {
        let storage = self.open_storage(project_root)?;
        Ok(PersistenceAdapter::with_key(storage, self.storage.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = NoteboardConfig::default();
        assert_eq!(config.board.default_color, "#ffffff");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, PathBuf::from(".noteboard"));
        assert_eq!(config.storage.key, "cards");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = NoteboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, NoteboardConfig::default());
    }

    #[test]
    fn test_partial_overrides() {
        let config = NoteboardConfig::from_toml_str(
            r##"
            [board]
            default_color = "#ffe4b5"

            [storage]
            key = "board"

            [logging]
            level = "debug"
            file = "logs/noteboard.log"
            "##,
        )
        .unwrap();

        assert_eq!(config.board.default_color, "#ffe4b5");
        assert_eq!(config.storage.key, "board");
        assert_eq!(config.storage.path, PathBuf::from(".noteboard"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("logs/noteboard.log"))
        );
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let err = NoteboardConfig::from_toml_str("[storage]\nbackend = \"redis\"\n").unwrap_err();
        assert!(matches!(err, NoteboardError::ConfigError(_)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = NoteboardConfig::load(&temp_dir.path().join(NoteboardConfig::FILE_NAME)).unwrap();
        assert_eq!(config, NoteboardConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(NoteboardConfig::FILE_NAME);
        std::fs::write(&path, "[storage]\npath = \"data\"\n").unwrap();

        let config = NoteboardConfig::load(&path).unwrap();
        assert_eq!(config.data_path(temp_dir.path()), temp_dir.path().join("data"));
    }

    #[tokio::test]
    async fn test_persistence_uses_configured_key() {
        let temp_dir = TempDir::new().unwrap();
        let config = NoteboardConfig::from_toml_str("[storage]\nkey = \"mine\"\n").unwrap();

        let adapter = config.persistence(temp_dir.path()).unwrap();
        assert_eq!(adapter.key(), "mine");
        adapter.save(&crate::domain::Board::default()).await.unwrap();
        assert!(temp_dir.path().join(".noteboard").join("mine.json").exists());
    }

    #[cfg(not(feature = "sqlite-storage"))]
    #[test]
    fn test_sqlite_without_feature() {
        let temp_dir = TempDir::new().unwrap();
        let config = NoteboardConfig::from_toml_str("[storage]\nbackend = \"sqlite\"\n").unwrap();
        assert!(matches!(
            config.open_storage(temp_dir.path()),
            Err(NoteboardError::ConfigError(_))
        ));
    }
}

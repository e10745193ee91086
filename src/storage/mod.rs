use crate::error::Result;
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Durable key/value slots holding serialized board state
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Reads the value stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the value under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

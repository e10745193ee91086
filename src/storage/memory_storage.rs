use crate::{
    error::{NoteboardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

/// In-process storage. Writes can be switched off to behave like a store
/// whose quota is exhausted.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    reject_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail until switched back
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| NoteboardError::StorageError("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(NoteboardError::StorageError(format!(
                "quota exceeded writing '{key}'"
            )));
        }
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("cards").await.unwrap(), None);

        storage.write("cards", "board").await.unwrap();
        assert_eq!(storage.read("cards").await.unwrap().as_deref(), Some("board"));
    }

    #[tokio::test]
    async fn test_rejected_writes_keep_previous_value() {
        let storage = MemoryStorage::new();
        storage.write("cards", "first").await.unwrap();

        storage.set_reject_writes(true);
        assert!(matches!(
            storage.write("cards", "second").await,
            Err(NoteboardError::StorageError(_))
        ));
        assert_eq!(storage.read("cards").await.unwrap().as_deref(), Some("first"));

        storage.set_reject_writes(false);
        storage.write("cards", "third").await.unwrap();
        assert_eq!(storage.read("cards").await.unwrap().as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn test_remove() {
        let storage = MemoryStorage::new();
        storage.write("cards", "board").await.unwrap();
        storage.remove("cards").await.unwrap();
        assert_eq!(storage.read("cards").await.unwrap(), None);
    }
}

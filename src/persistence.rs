//! Board persistence.
//!
//! The whole board is stored as one JSON blob under one storage key.
//! Saving reports failures as [`NoteboardError::PersistenceUnavailable`];
//! loading never fails and falls back to an empty board instead.

use crate::{
    domain::Board,
    error::{NoteboardError, Result},
    storage::Storage,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Serializes a board into its persisted JSON form
pub fn encode(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(board)?)
}

/// Parses and checks a persisted board
pub fn decode(blob: &str) -> Result<Board> {
    let mut board: Board = serde_json::from_str(blob)?;
    board.validate()?;
    Ok(board)
}

/// Saves and restores the board through a [`Storage`] slot
#[derive(Clone)]
pub struct PersistenceAdapter {
    storage: Arc<dyn Storage>,
    key: String,
}

impl PersistenceAdapter {
    pub const DEFAULT_KEY: &'static str = "cards";

    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, Self::DEFAULT_KEY)
    }

    pub fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Writes the full board to the slot
    pub async fn save(&self, board: &Board) -> Result<()> {
        let blob = encode(board).map_err(unavailable)?;
        self.storage
            .write(&self.key, &blob)
            .await
            .map_err(unavailable)?;
        debug!(key = %self.key, bytes = blob.len(), "board saved");
        Ok(())
    }

    /// Reads the board from the slot. Missing, unreadable, or malformed
    /// state yields a fresh default board.
    pub async fn load(&self) -> Board {
        let blob = match self.storage.read(&self.key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = %self.key, "no saved board, starting fresh");
                return Board::default();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not read saved board, starting fresh");
                return Board::default();
            }
        };

        match decode(&blob) {
            Ok(board) => {
                debug!(
                    key = %self.key,
                    cards = board.cards().count(),
                    next_card_id = board.next_card_id,
                    "board loaded"
                );
                board
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "saved board is malformed, starting fresh");
                Board::default()
            }
        }
    }

    /// Deletes the saved board
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key).await.map_err(unavailable)
    }
}

fn unavailable(err: NoteboardError) -> NoteboardError {
    match err {
        NoteboardError::PersistenceUnavailable(_) => err,
        other => NoteboardError::PersistenceUnavailable(other.to_string()),
    }
}

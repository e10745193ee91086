use crate::domain::{CardId, ColumnKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NoteboardError>;

#[derive(Debug, Error)]
pub enum NoteboardError {
    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Item {index} not found on card {card_id}")]
    ItemNotFound { card_id: CardId, index: usize },

    #[error("Invalid card ID format: {0}")]
    InvalidCardId(String),

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Column {column} is full ({capacity} cards)")]
    CapacityExceeded { column: ColumnKind, capacity: usize },

    #[error("Card ids exhausted")]
    CardIdsExhausted,

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Malformed board: {0}")]
    MalformedBoard(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

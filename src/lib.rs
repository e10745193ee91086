//! # Noteboard
//!
//! Core logic for a three-column checklist kanban.
//!
//! Cards start in Intake, move to In Progress once more than half of their
//! checklist is done, and land in Done when every item is checked. The
//! board is saved as a single blob after every change. Rendering is left
//! to the caller, which drives a [`BoardStore`] and subscribes to its
//! [`BoardEvent`]s.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::NoteboardConfig;
pub use domain::{
    board::{Board, Column, ColumnKind},
    card::{Card, CardId, Item},
};
pub use error::{NoteboardError, Result};
pub use persistence::PersistenceAdapter;
pub use storage::Storage;
pub use store::{BoardEvent, BoardStore, CardField};

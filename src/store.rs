//! The board store.
//!
//! [`BoardStore`] owns the live board. Every command validates, mutates,
//! runs the auto-move rule, saves through the [`PersistenceAdapter`], and
//! then publishes [`BoardEvent`]s to subscribers. A failed save is logged
//! and published but never undoes the mutation; the next command saves
//! again.

use crate::{
    domain::{Board, Card, CardId, ColumnKind, Item, Transition},
    error::{NoteboardError, Result},
    persistence::PersistenceAdapter,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Editable display fields of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Title,
    Color,
}

/// Change notification published after each mutation
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    CardAdded {
        card_id: CardId,
        column: ColumnKind,
    },
    CardRemoved {
        card_id: CardId,
        column: ColumnKind,
    },
    CardUpdated {
        card_id: CardId,
    },
    CardMoved {
        card_id: CardId,
        from: ColumnKind,
        to: ColumnKind,
    },
    PersistenceFailed {
        reason: String,
    },
}

impl From<Transition> for BoardEvent {
    fn from(transition: Transition) -> Self {
        Self::CardMoved {
            card_id: transition.card_id,
            from: transition.from,
            to: transition.to,
        }
    }
}

pub struct BoardStore {
    board: Board,
    persistence: PersistenceAdapter,
    default_color: String,
    events: broadcast::Sender<BoardEvent>,
    last_persistence_error: Option<String>,
}

impl BoardStore {
    /// Opens the store with whatever board the adapter has saved
    pub async fn open(persistence: PersistenceAdapter, default_color: impl Into<String>) -> Self {
        let board = persistence.load().await;
        Self::with_board(board, persistence, default_color)
    }

    /// Wraps an existing board without reading storage
    pub fn with_board(
        board: Board,
        persistence: PersistenceAdapter,
        default_color: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            board,
            persistence,
            default_color: default_color.into(),
            events,
            last_persistence_error: None,
        }
    }

    /// Read-only view of the live board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_intake_locked(&self) -> bool {
        self.board.is_intake_locked()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Reason the most recent save failed, cleared by the next good save
    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    pub async fn add_card(&mut self, column: ColumnKind) -> Result<CardId> {
        let card_id = self.board.add_card(column, &self.default_color)?;
        debug!(%card_id, %column, "card added");
        self.commit(vec![BoardEvent::CardAdded { card_id, column }]).await;
        Ok(card_id)
    }

    /// Removes a card wherever it is. Unknown ids are ignored.
    pub async fn remove_card(&mut self, card_id: CardId) -> Option<Card> {
        let Some((column, card)) = self.board.remove_card(card_id) else {
            debug!(%card_id, "remove ignored, no such card");
            return None;
        };
        debug!(%card_id, %column, "card removed");
        self.commit(vec![BoardEvent::CardRemoved { card_id, column }]).await;
        Some(card)
    }

    /// Appends a checklist item. Blank text or a full checklist is ignored
    /// and reported as `Ok(false)`.
    pub async fn add_item(&mut self, card_id: CardId, text: &str) -> Result<bool> {
        let card = self.card_mut(card_id)?;
        if !card.add_item(text) {
            debug!(%card_id, items = card.items.len(), "item rejected");
            return Ok(false);
        }
        self.settle(card_id).await;
        Ok(true)
    }

    pub async fn set_item_completed(
        &mut self,
        card_id: CardId,
        index: usize,
        completed: bool,
    ) -> Result<()> {
        self.item_mut(card_id, index)?.completed = completed;
        debug!(%card_id, index, completed, "item checked");
        self.settle(card_id).await;
        Ok(())
    }

    /// Flips an item and returns its new state
    pub async fn toggle_item(&mut self, card_id: CardId, index: usize) -> Result<bool> {
        let completed = !self.item_mut(card_id, index)?.completed;
        self.set_item_completed(card_id, index, completed).await?;
        Ok(completed)
    }

    pub async fn edit_item_text(
        &mut self,
        card_id: CardId,
        index: usize,
        text: &str,
    ) -> Result<()> {
        self.item_mut(card_id, index)?.text = text.to_string();
        self.commit(vec![BoardEvent::CardUpdated { card_id }]).await;
        Ok(())
    }

    /// Changes a display field. Never moves the card.
    pub async fn edit_card_field(
        &mut self,
        card_id: CardId,
        field: CardField,
        value: &str,
    ) -> Result<()> {
        let card = self.card_mut(card_id)?;
        match field {
            CardField::Title => card.title = value.to_string(),
            CardField::Color => card.color = value.to_string(),
        }
        self.commit(vec![BoardEvent::CardUpdated { card_id }]).await;
        Ok(())
    }

    fn card_mut(&mut self, card_id: CardId) -> Result<&mut Card> {
        self.board
            .card_mut(card_id)
            .ok_or(NoteboardError::CardNotFound(card_id))
    }

    fn item_mut(&mut self, card_id: CardId, index: usize) -> Result<&mut Item> {
        self.card_mut(card_id)?
            .items
            .get_mut(index)
            .ok_or(NoteboardError::ItemNotFound { card_id, index })
    }

    /// Runs the auto-move rule after a checklist change, then commits
    async fn settle(&mut self, card_id: CardId) {
        let mut events = vec![BoardEvent::CardUpdated { card_id }];
        if let Some(transition) = self.board.advance(card_id) {
            if transition.to == ColumnKind::Done {
                info!(%card_id, "card completed");
            } else {
                info!(%card_id, from = %transition.from, to = %transition.to, "card moved");
            }
            events.push(transition.into());
        }
        self.commit(events).await;
    }

    async fn commit(&mut self, mut events: Vec<BoardEvent>) {
        match self.persistence.save(&self.board).await {
            Ok(()) => self.last_persistence_error = None,
            Err(err) => {
                let reason = err.to_string();
                warn!(error = %reason, "board change kept in memory only");
                self.last_persistence_error = Some(reason.clone());
                events.push(BoardEvent::PersistenceFailed { reason });
            }
        }
        for event in events {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }
}

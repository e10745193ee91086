use crate::domain::card::{Card, CardId};
use crate::error::{NoteboardError, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

/// Role of a column on the board. The role is fixed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Intake,
    InProgress,
    Done,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 3] = [Self::Intake, Self::InProgress, Self::Done];

    pub fn index(self) -> usize {
        match self {
            Self::Intake => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| NoteboardError::InvalidColumn(index.to_string()))
    }

    /// Maximum number of cards the column may hold; `None` is unbounded
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::Intake => Some(3),
            Self::InProgress => Some(5),
            Self::Done => None,
        }
    }

    /// Title given to the column on a fresh board
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Intake => "Intake",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intake => write!(f, "Intake"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for ColumnKind {
    type Err = NoteboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "intake" | "1" => Ok(Self::Intake),
            "inprogress" | "2" => Ok(Self::InProgress),
            "done" | "3" => Ok(Self::Done),
            _ => Err(NoteboardError::InvalidColumn(format!(
                "'{}'. Valid columns: intake, in-progress, done",
                s
            ))),
        }
    }
}

/// An ordered holder of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cards: Vec::new(),
        }
    }
}

/// A card moving from one column to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub card_id: CardId,
    pub from: ColumnKind,
    pub to: ColumnKind,
}

/// Kanban board state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub columns: [Column; 3],
    pub next_card_id: u32,
}

impl Board {
    pub fn new() -> Self {
        Self {
            columns: ColumnKind::ALL.map(|kind| Column::new(kind.default_title())),
            next_card_id: 1,
        }
    }

    pub fn column(&self, kind: ColumnKind) -> &Column {
        &self.columns[kind.index()]
    }

    fn column_mut(&mut self, kind: ColumnKind) -> &mut Column {
        &mut self.columns[kind.index()]
    }

    /// Generates the next card ID. Ids are never handed out twice.
    pub fn next_card_id(&mut self) -> Result<CardId> {
        let next = self
            .next_card_id
            .checked_add(1)
            .ok_or(NoteboardError::CardIdsExhausted)?;
        let id = CardId::new(self.next_card_id);
        self.next_card_id = next;
        Ok(id)
    }

    /// Whether the column can take one more card
    pub fn has_capacity(&self, kind: ColumnKind) -> bool {
        kind.capacity()
            .map_or(true, |capacity| self.column(kind).cards.len() < capacity)
    }

    /// Intake refuses new cards while In Progress is full
    pub fn is_intake_locked(&self) -> bool {
        !self.has_capacity(ColumnKind::InProgress)
    }

    /// Checks whether a new card may be created in the column
    pub fn ensure_can_add(&self, kind: ColumnKind) -> Result<()> {
        if let (false, Some(capacity)) = (self.has_capacity(kind), kind.capacity()) {
            return Err(NoteboardError::CapacityExceeded {
                column: kind,
                capacity,
            });
        }
        if kind == ColumnKind::Intake && self.is_intake_locked() {
            return Err(NoteboardError::CapacityExceeded {
                column: ColumnKind::InProgress,
                capacity: ColumnKind::InProgress.capacity().unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Creates a default card at the end of the column
    pub fn add_card(&mut self, kind: ColumnKind, color: &str) -> Result<CardId> {
        self.ensure_can_add(kind)?;
        let id = self.next_card_id()?;
        self.column_mut(kind).cards.push(Card::new(id, color));
        Ok(id)
    }

    /// Removes the first card with the id, scanning columns in board order
    pub fn remove_card(&mut self, id: CardId) -> Option<(ColumnKind, Card)> {
        let (kind, position) = self.locate(id)?;
        let card = self.column_mut(kind).cards.remove(position);
        Some((kind, card))
    }

    /// Finds the column and position holding the card
    pub fn locate(&self, id: CardId) -> Option<(ColumnKind, usize)> {
        ColumnKind::ALL.into_iter().find_map(|kind| {
            self.column(kind)
                .cards
                .iter()
                .position(|card| card.id == id)
                .map(|position| (kind, position))
        })
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        let (kind, position) = self.locate(id)?;
        self.column(kind).cards.get(position)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let (kind, position) = self.locate(id)?;
        self.column_mut(kind).cards.get_mut(position)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.columns.iter().flat_map(|column| column.cards.iter())
    }

    /// Transfers a card to the end of another column. Capacity is checked
    /// before the card leaves its source.
    fn move_card(&mut self, id: CardId, to: ColumnKind) -> Result<Transition> {
        let (from, position) = self.locate(id).ok_or(NoteboardError::CardNotFound(id))?;
        if let (false, Some(capacity)) = (self.has_capacity(to), to.capacity()) {
            return Err(NoteboardError::CapacityExceeded {
                column: to,
                capacity,
            });
        }
        let card = self.column_mut(from).cards.remove(position);
        self.column_mut(to).cards.push(card);
        Ok(Transition {
            card_id: id,
            from,
            to,
        })
    }

    /// Applies the auto-move rule to one card.
    ///
    /// Intake cards more than half complete go to In Progress when it has
    /// room. In Progress cards with every item checked go to Done and get
    /// their completion date. Done is terminal. At most one step is taken
    /// per evaluation, and cards without items are never evaluated.
    pub fn advance(&mut self, id: CardId) -> Option<Transition> {
        let (kind, position) = self.locate(id)?;
        let card = &self.column(kind).cards[position];
        if card.items.is_empty() {
            return None;
        }

        match kind {
            ColumnKind::Intake if card.is_more_than_half_complete() => {
                self.move_card(id, ColumnKind::InProgress).ok()
            }
            ColumnKind::InProgress if card.is_complete() => {
                let transition = self.move_card(id, ColumnKind::Done).ok()?;
                if let Some(card) = self.card_mut(id) {
                    card.mark_completed();
                }
                Some(transition)
            }
            _ => None,
        }
    }

    /// Checks the structural invariants of a board read from storage.
    ///
    /// A stale counter is raised past the highest id instead of rejected,
    /// as long as the raised counter can still hand out an id.
    pub fn validate(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for kind in ColumnKind::ALL {
            let column = self.column(kind);
            if let Some(capacity) = kind.capacity() {
                if column.cards.len() > capacity {
                    return Err(NoteboardError::MalformedBoard(format!(
                        "column {} holds {} cards, limit is {}",
                        kind,
                        column.cards.len(),
                        capacity
                    )));
                }
            }
            for card in &column.cards {
                if !seen.insert(card.id) {
                    return Err(NoteboardError::MalformedBoard(format!(
                        "duplicate card id {}",
                        card.id
                    )));
                }
                if card.items.len() > Card::MAX_ITEMS {
                    return Err(NoteboardError::MalformedBoard(format!(
                        "card {} has {} items, limit is {}",
                        card.id,
                        card.items.len(),
                        Card::MAX_ITEMS
                    )));
                }
                if kind != ColumnKind::Done && card.completed_date.is_some() {
                    return Err(NoteboardError::MalformedBoard(format!(
                        "card {} in {} has a completion date",
                        card.id, kind
                    )));
                }
            }
        }

        if let Some(max) = seen.iter().map(CardId::as_u32).max() {
            let floor = max.checked_add(1).ok_or_else(|| {
                NoteboardError::MalformedBoard(format!(
                    "card id {} is out of range",
                    CardId::new(max)
                ))
            })?;
            self.next_card_id = self.next_card_id.max(floor);
        }
        if self.next_card_id == u32::MAX {
            return Err(NoteboardError::MalformedBoard(
                "card id counter is exhausted".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unique identifier for a card, assigned from the board counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u32);

impl CardId {
    /// Creates a new CardId from a counter value
    pub fn new(counter: u32) -> Self {
        Self(counter)
    }

    /// Returns the raw counter value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl FromStr for CardId {
    type Err = crate::error::NoteboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both "12" and "#12"
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| crate::error::NoteboardError::InvalidCardId(s.to_string()))
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single checklist line on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    pub completed: bool,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// A checklist-bearing card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub color: String,
    pub items: Vec<Item>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

impl Card {
    /// Maximum number of checklist items a card may hold
    pub const MAX_ITEMS: usize = 5;

    /// Number of blank items a freshly created card starts with
    pub const DEFAULT_ITEMS: usize = 3;

    /// Creates a card with the default title and three blank, unchecked items
    pub fn new(id: CardId, color: impl Into<String>) -> Self {
        Self {
            id,
            title: format!("Card {}", id.as_u32()),
            color: color.into(),
            items: (0..Self::DEFAULT_ITEMS).map(|_| Item::new("")).collect(),
            completed_date: None,
        }
    }

    /// Whether another item may be appended
    pub fn has_item_room(&self) -> bool {
        self.items.len() < Self::MAX_ITEMS
    }

    /// Appends an unchecked item. Blank text and full checklists are
    /// rejected; returns whether the item was added.
    pub fn add_item(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || !self.has_item_room() {
            return false;
        }
        self.items.push(Item::new(text));
        true
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Fraction of completed items, or `None` for a card without items
    pub fn completion_rate(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.completed_count() as f64 / self.items.len() as f64)
    }

    /// Strictly more than half of the items are checked
    pub fn is_more_than_half_complete(&self) -> bool {
        !self.items.is_empty() && self.completed_count() * 2 > self.items.len()
    }

    /// Every item is checked. A card without items is never complete.
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.completed)
    }

    /// Stamps the completion date. An existing date is kept.
    pub fn mark_completed(&mut self) {
        if self.completed_date.is_none() {
            self.completed_date = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_display_and_parse() {
        let id = CardId::new(7);
        assert_eq!(id.to_string(), "#7");
        assert_eq!(CardId::from_str("7").unwrap(), id);
        assert_eq!(CardId::from_str("#7").unwrap(), id);
        assert!(CardId::from_str("seven").is_err());
    }

    #[test]
    fn test_new_card_defaults() {
        let card = Card::new(CardId::new(3), "#ffffff");
        assert_eq!(card.title, "Card 3");
        assert_eq!(card.color, "#ffffff");
        assert_eq!(card.items.len(), 3);
        assert!(card.items.iter().all(|item| !item.completed));
        assert!(card.completed_date.is_none());
    }

    #[test]
    fn test_add_item_rejects_blank_text() {
        let mut card = Card::new(CardId::new(1), "#fff");
        assert!(!card.add_item(""));
        assert!(!card.add_item("   "));
        assert_eq!(card.items.len(), 3);
    }

    #[test]
    fn test_add_item_respects_limit() {
        let mut card = Card::new(CardId::new(1), "#fff");
        assert!(card.add_item("fourth"));
        assert!(card.add_item("fifth"));
        assert!(!card.add_item("sixth"));
        assert_eq!(card.items.len(), Card::MAX_ITEMS);
        assert_eq!(card.items[3].text, "fourth");
    }

    #[test]
    fn test_completion_rate_without_items() {
        let mut card = Card::new(CardId::new(1), "#fff");
        card.items.clear();
        assert_eq!(card.completion_rate(), None);
        assert!(!card.is_more_than_half_complete());
        assert!(!card.is_complete());
    }

    #[test]
    fn test_more_than_half_is_strict() {
        let mut card = Card::new(CardId::new(1), "#fff");
        card.items.pop();
        card.items[0].completed = true;
        // 1 of 2 is exactly half
        assert_eq!(card.completion_rate(), Some(0.5));
        assert!(!card.is_more_than_half_complete());

        card.items[1].completed = true;
        assert!(card.is_more_than_half_complete());
        assert!(card.is_complete());
    }

    #[test]
    fn test_two_of_three_is_more_than_half() {
        let mut card = Card::new(CardId::new(1), "#fff");
        card.items[0].toggle();
        card.items[1].toggle();
        assert!(card.is_more_than_half_complete());
        assert!(!card.is_complete());
        assert_eq!(card.completed_count(), 2);
    }

    #[test]
    fn test_mark_completed_keeps_first_date() {
        let mut card = Card::new(CardId::new(1), "#fff");
        card.mark_completed();
        let first = card.completed_date;
        assert!(first.is_some());

        std::thread::sleep(std::time::Duration::from_millis(5));
        card.mark_completed();
        assert_eq!(card.completed_date, first);
    }

    #[test]
    fn test_card_serializes_camel_case() {
        let card = Card::new(CardId::new(1), "#fff");
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json.get("completedDate").is_some());
        assert!(json["completedDate"].is_null());
        assert_eq!(json["items"][0]["completed"], false);
    }

    #[test]
    fn test_card_without_completed_date_key_deserializes() {
        let json = r##"{"id":4,"title":"Card 4","color":"#fff","items":[]}"##;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId::new(4));
        assert!(card.completed_date.is_none());
    }
}

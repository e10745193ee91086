pub mod board;
pub mod card;

pub use board::{Board, Column, ColumnKind, Transition};
pub use card::{Card, CardId, Item};

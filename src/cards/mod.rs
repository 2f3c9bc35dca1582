//! Card faces, card entities, and deck construction.

pub mod card;
pub mod deck;

pub use card::{Card, Colour, Rank, Suit};
pub use deck::standard_52_deck;

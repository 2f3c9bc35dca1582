//! Deck construction.
//!
//! Save data refers to cards by arena position, so decks are always built
//! in the same order: suits in `Suit::ALL` order, ranks ace to king within
//! each suit.

use crate::core::{CardId, PileId};
use crate::piles::Table;

use super::card::{Rank, Suit};

/// Build a standard 52-card deck into `pile`, face down.
///
/// Returns the new cards in construction order.
pub fn standard_52_deck(table: &mut Table, pile: PileId) -> Vec<CardId> {
    let mut deck = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(table.create_card(pile, suit, suit.colour(), rank));
        }
    }
    deck
}

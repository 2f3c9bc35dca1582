//! Pile entities.
//!
//! A `Pile` is an ordered sequence of card handles (index 0 = bottom, last =
//! top) plus a `max_fan` presentation hint. Piles never change identity;
//! only their contents move.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, PileId};

/// Default and maximum `max_fan` value.
pub const MAX_FAN: u32 = 999;

/// An ordered pile of cards.
///
/// Uses an `im` vector so a table can be copied cheaply when save data is
/// verified against a scratch layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    id: PileId,
    pub(crate) cards: Vector<CardId>,
    pub(crate) max_fan: u32,
}

impl Pile {
    pub(crate) fn new(id: PileId) -> Self {
        Self {
            id,
            cards: Vector::new(),
            max_fan: MAX_FAN,
        }
    }

    /// This pile's handle.
    #[must_use]
    pub fn id(&self) -> PileId {
        self.id
    }

    /// Number of cards in the pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// How many of the topmost cards the view should fan out.
    #[must_use]
    pub fn max_fan(&self) -> u32 {
        self.max_fan
    }

    /// Card at `index`, or `None` past the top.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CardId> {
        self.cards.get(index).copied()
    }

    /// Card at `index`.
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn at(&self, index: usize) -> CardId {
        match self.cards.get(index) {
            Some(&card) => card,
            None => panic!("{} has no card at index {index} (len {})", self.id, self.len()),
        }
    }

    /// Top card, if any.
    #[must_use]
    pub fn peek(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Bottom card, if any.
    #[must_use]
    pub fn bottom(&self) -> Option<CardId> {
        self.cards.front().copied()
    }

    /// Position of `card` in this pile.
    #[must_use]
    pub fn index_of(&self, card: CardId) -> Option<usize> {
        self.cards.index_of(&card)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.index_of(card).is_some()
    }

    /// Cards bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    /// Cards from `start` to the top.
    #[must_use]
    pub fn cards_from(&self, start: usize) -> Vec<CardId> {
        self.cards.iter().skip(start).copied().collect()
    }
}

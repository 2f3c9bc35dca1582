//! Card entities.
//!
//! A `Card` has an immutable face (suit, colour, rank) and mutable placement
//! state (owning pile, offset within that pile, orientation). Placement is
//! only ever written by the `Table` primitives that back the undoable
//! operations, so every change is captured by the undo history.

use serde::{Deserialize, Serialize};

use crate::core::PileId;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits in deck construction order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Colour of this suit in a standard deck.
    #[must_use]
    pub const fn colour(self) -> Colour {
        match self {
            Suit::Spades | Suit::Clubs => Colour::Black,
            Suit::Hearts | Suit::Diamonds => Colour::Red,
        }
    }
}

/// Card colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Colour {
    Black,
    Red,
}

/// Card rank. Discriminants are the pip values (ace low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks from ace to king.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Pip value, ace = 1 through king = 13.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// The rank directly above this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Rank> {
        Rank::ALL.get(self.value() as usize).copied()
    }
}

/// A card and its current placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    suit: Suit,
    colour: Colour,
    rank: Rank,
    pub(crate) pile: PileId,
    pub(crate) pile_index: usize,
    pub(crate) face_up: bool,
}

impl Card {
    pub(crate) fn new(suit: Suit, colour: Colour, rank: Rank, pile: PileId, pile_index: usize) -> Self {
        Self {
            suit,
            colour,
            rank,
            pile,
            pile_index,
            face_up: false,
        }
    }

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    #[must_use]
    pub fn colour(&self) -> Colour {
        self.colour
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Pile currently holding this card.
    #[must_use]
    pub fn pile(&self) -> PileId {
        self.pile
    }

    /// Offset of this card within its pile (0 = bottom).
    #[must_use]
    pub fn pile_index(&self) -> usize {
        self.pile_index
    }

    #[must_use]
    pub fn face_up(&self) -> bool {
        self.face_up
    }
}

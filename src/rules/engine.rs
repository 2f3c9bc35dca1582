//! Rule strategy trait for concrete solitaire games.
//!
//! A game implements `Rules` to decide what each player interaction does.
//! The engine (`Game`) owns the transaction and undo machinery and calls
//! into the rules; the rules never see the history.
//!
//! ## Implementation Notes
//!
//! - Entry hooks receive a read-only table and return a `Steps` sequence.
//!   All mutation happens inside the steps, through the table's undoable
//!   mutators, while the engine holds a transaction open.
//! - Returning an empty sequence is a legal no-op: nothing is committed.
//! - `can_drag` and `preview_drop` are pure queries and never mutate.

use smallvec::SmallVec;

use crate::core::{CardId, GameRng, PileId};
use crate::piles::Table;

use super::steps::Steps;

/// Answer to "may this card be lifted?".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragInfo {
    pub can_drag: bool,
    /// Cards that travel along with the dragged one, bottom to top.
    pub extra_cards: SmallVec<[CardId; 16]>,
}

impl DragInfo {
    /// The card cannot be dragged.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The card can be dragged on its own.
    #[must_use]
    pub fn single() -> Self {
        Self {
            can_drag: true,
            extra_cards: SmallVec::new(),
        }
    }

    /// The card can be dragged together with `extra`.
    #[must_use]
    pub fn with_extra(extra: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            can_drag: true,
            extra_cards: extra.into_iter().collect(),
        }
    }
}

/// Per-game rule hooks.
pub trait Rules: Sized + 'static {
    /// Whether the table is in a winning position.
    fn is_won(&self, table: &Table) -> bool;

    /// Cards to celebrate once won.
    fn won_cards(&self, _table: &Table) -> Vec<CardId> {
        Vec::new()
    }

    /// Deal a new game.
    ///
    /// `rng` is seeded from the restart seed; the steps run inside a
    /// transaction whose history is discarded afterwards.
    fn restart(&mut self, table: &Table, rng: GameRng) -> Steps<Self>;

    /// Primary interaction with a pile (tap or click).
    fn pile_primary(&mut self, _table: &Table, _pile: PileId) -> Steps<Self> {
        Steps::new()
    }

    /// Secondary interaction with a pile (double tap or right click).
    fn pile_secondary(&mut self, _table: &Table, _pile: PileId) -> Steps<Self> {
        Steps::new()
    }

    fn card_primary(&mut self, _table: &Table, _card: CardId) -> Steps<Self> {
        Steps::new()
    }

    fn card_secondary(&mut self, _table: &Table, _card: CardId) -> Steps<Self> {
        Steps::new()
    }

    /// Whether `card` may be lifted and which cards come with it.
    fn can_drag(&self, _table: &Table, _card: CardId) -> DragInfo {
        DragInfo::none()
    }

    /// Whether dropping `card` on `pile` would be accepted. Pure.
    fn preview_drop(&self, _table: &Table, _card: CardId, _pile: PileId) -> bool {
        false
    }

    /// Drop `card` (and its drag companions) on `pile`.
    fn drop_card(&mut self, _table: &Table, _card: CardId, _pile: PileId) -> Steps<Self> {
        Steps::new()
    }
}

//! Arena handles for cards and piles.
//!
//! A `Table` owns every card and pile in a game. Everything else refers to
//! them through these small copyable handles: a position in the table's
//! arenas plus the `TableId` of the table that issued it.
//!
//! ## Ownership
//!
//! Every table draws a process-unique `TableId` when it is created, and
//! stamps it on each handle it hands out. A table rejects handles carrying
//! another stamp, so a card of one game can never act on a second game that
//! happens to have a card at the same position.
//!
//! Handles built with `CardId::new` / `PileId::new` carry no stamp. They
//! are plain positions, useful as keys and in tests, and every table
//! rejects them.
//!
//! ## Stability
//!
//! Positions are assigned in construction order. A rule set must build its
//! piles and deck in the same order every time, because persisted save data
//! stores only the positions.
//!
//! ```
//! use solitaire_core::core::{CardId, PileId};
//!
//! let card = CardId::new(12);
//! assert_eq!(card.index(), 12);
//! assert!(card.table().is_none());
//! assert_eq!(format!("{}", PileId::new(3)), "Pile(3)");
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Table ids are unique across every table in the process. Zero is never
/// issued.
static NEXT_TABLE: AtomicU32 = AtomicU32::new(1);

/// Identity of the table that issued a handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(u32);

impl TableId {
    /// The stamp of handles no table issued.
    pub const NONE: TableId = TableId(0);

    /// Draw a fresh id.
    pub(crate) fn next() -> Self {
        Self(NEXT_TABLE.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Table({})", self.0)
    }
}

/// Handle of a card within its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId {
    index: u16,
    table: TableId,
}

impl CardId {
    /// An unstamped handle for arena position `id`.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self::issued(TableId::NONE, id)
    }

    pub(crate) const fn issued(table: TableId, id: u16) -> Self {
        Self { index: id, table }
    }

    /// Position in the table's card arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.index
    }

    /// The table that issued this handle.
    #[must_use]
    pub const fn table(self) -> TableId {
        self.table
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.index)
    }
}

/// Handle of a pile within its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PileId {
    index: u16,
    table: TableId,
}

impl PileId {
    /// An unstamped handle for arena position `id`.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self::issued(TableId::NONE, id)
    }

    pub(crate) const fn issued(table: TableId, id: u16) -> Self {
        Self { index: id, table }
    }

    /// Position in the table's pile arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.index
    }

    /// The table that issued this handle.
    #[must_use]
    pub const fn table(self) -> TableId {
        self.table
    }
}

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pile({})", self.index)
    }
}

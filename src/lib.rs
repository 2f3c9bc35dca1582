//! # solitaire-core
//!
//! A transactional, undoable, serializable engine for solitaire card games.
//!
//! ## Design Principles
//!
//! 1. **Every Mutation Is Undoable**: Card placement, card orientation and
//!    pile fan only change through operations that record their before and
//!    after state. Undo and redo replay those records, never the rules.
//!
//! 2. **One Transaction At A Time**: A player action opens a transaction,
//!    runs as a resumable step sequence, and commits as one compound
//!    operation. Any other action attempted meanwhile is refused.
//!
//! 3. **Rules Are A Strategy**: Concrete games implement the `Rules` trait.
//!    The engine owns the table, the history and the win bookkeeping.
//!
//! ## Architecture
//!
//! - **Arena Model**: The `Table` owns every card and pile. Cards and piles
//!   refer to each other through `CardId` / `PileId` handles.
//!
//! - **Persistent Data Structures**: Piles and history stacks use `im-rs`,
//!   so the scratch copy used to verify save data is cheap.
//!
//! - **Token Stream Saves**: State is persisted as a flat list of integers
//!   (JSON or bincode) with positional card and pile ids and tagged
//!   operation payloads. Loading is all-or-nothing.
//!
//! ## Modules
//!
//! - `core`: Card/pile handles, RNG, pacing hints
//! - `cards`: Suits, ranks, card entities, deck construction
//! - `piles`: Pile entities and the `Table` arena
//! - `undo`: Undoable operations, compounds, undo history
//! - `serialization`: Token stream codec and save data
//! - `rules`: `Rules` trait and step sequences
//! - `game`: The `Game` transaction engine
//! - `scheduler`: Queued, paced, persisted move execution
//! - `games`: Reference rule sets

pub mod core;
pub mod cards;
pub mod piles;
pub mod undo;
pub mod serialization;
pub mod rules;
pub mod game;
pub mod scheduler;
pub mod games;

// Re-export commonly used types
pub use crate::core::{CardId, DelayHint, GameRng, PileId, TableId};

pub use crate::cards::{standard_52_deck, Card, Colour, Rank, Suit};

pub use crate::piles::{Pile, Table, TableObserver, MAX_FAN};

pub use crate::undo::{
    CardFlip, CompoundOperation, Operation, OperationKind, PileInsert, PileMaxFan, UndoHistory,
};

pub use crate::serialization::{
    LoadError, PileLayout, SaveData, SerializationContext, MAX_NESTING, SAVE_DATA_FORMAT,
};

pub use crate::rules::{DragInfo, Rules, Steps};

pub use crate::game::{Game, GameListener, Transaction, TransactionKind};

pub use crate::scheduler::{
    MemoryStore, Move, MoveQueue, MoveScheduler, PacingConfig, SaveStore, StoreError,
};

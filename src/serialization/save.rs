//! Persisted game state.
//!
//! ## Layout
//!
//! | Field | Tokens |
//! |---|---|
//! | format | `SAVE_DATA_FORMAT` |
//! | games started, games won | one each |
//! | face up | one 0/1 per card, arena order |
//! | piles | per pile, arena order: max fan, card count, card ids |
//! | undo stack | entry count, then id + payload per entry, oldest first |
//! | redo stack | same as the undo stack |
//!
//! Every token must be consumed: trailing tokens fail the load.

use crate::core::CardId;
use crate::piles::Table;
use crate::undo::{CompoundOperation, OperationKind, UndoHistory};

use super::context::SerializationContext;
use super::error::LoadError;

/// Version token that leads every save.
pub const SAVE_DATA_FORMAT: i64 = 3;

/// One pile's persisted contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PileLayout {
    pub max_fan: u32,
    /// Bottom to top.
    pub cards: Vec<CardId>,
}

/// Full persisted state of a game, decoded but not yet applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveData {
    pub games_started: u32,
    pub games_won: u32,
    pub face_up: Vec<bool>,
    pub piles: Vec<PileLayout>,
    pub undo: Vec<CompoundOperation>,
    pub redo: Vec<CompoundOperation>,
}

impl SaveData {
    /// Snapshot the live state.
    #[must_use]
    pub fn capture(table: &Table, history: &UndoHistory, games_started: u32, games_won: u32) -> Self {
        Self {
            games_started,
            games_won,
            face_up: table.cards().iter().map(|card| card.face_up()).collect(),
            piles: table
                .piles()
                .iter()
                .map(|pile| PileLayout {
                    max_fan: pile.max_fan(),
                    cards: pile.iter().collect(),
                })
                .collect(),
            undo: history.undo_entries().cloned().collect(),
            redo: history.redo_entries().cloned().collect(),
        }
    }

    pub fn write(&self, context: &mut SerializationContext) {
        context.write(SAVE_DATA_FORMAT);
        context.write(i64::from(self.games_started));
        context.write(i64::from(self.games_won));
        for &face_up in &self.face_up {
            context.write_bool(face_up);
        }
        for pile in &self.piles {
            context.write(i64::from(pile.max_fan));
            context.write_index(pile.cards.len());
            for &card in &pile.cards {
                context.write_card(card);
            }
        }
        for stack in [&self.undo, &self.redo] {
            context.write_index(stack.len());
            for entry in stack {
                context.write_kind(OperationKind::Compound);
                entry.write(context);
            }
        }
    }

    /// Decode a complete save. Fails on any trailing token.
    pub fn read(context: &mut SerializationContext) -> Result<Self, LoadError> {
        let found = context.read()?;
        if found != SAVE_DATA_FORMAT {
            return Err(LoadError::UnsupportedFormat {
                found,
                expected: SAVE_DATA_FORMAT,
            });
        }

        let games_started = context.read_u32()?;
        let games_won = context.read_u32()?;

        let face_up = (0..context.card_count())
            .map(|_| context.read_bool())
            .collect::<Result<Vec<_>, _>>()?;

        let mut piles = Vec::with_capacity(context.pile_count());
        for _ in 0..context.pile_count() {
            let max_fan = context.read_max_fan()?;
            let count = context.read_index()?;
            let cards = (0..count)
                .map(|_| context.read_card())
                .collect::<Result<Vec<_>, _>>()?;
            piles.push(PileLayout { max_fan, cards });
        }

        let undo = read_stack(context)?;
        let redo = read_stack(context)?;
        context.ensure_at_end()?;

        Ok(Self {
            games_started,
            games_won,
            face_up,
            piles,
            undo,
            redo,
        })
    }

    /// Check that the layout fits `table` and places every card exactly once.
    pub fn validate_layout(&self, table: &Table) -> Result<(), LoadError> {
        if self.face_up.len() != table.cards().len() || self.piles.len() != table.piles().len() {
            return Err(LoadError::InvalidLayout);
        }
        let mut seen = vec![false; table.cards().len()];
        for &card in self.piles.iter().flat_map(|pile| &pile.cards) {
            if !table.owns_card(card) {
                return Err(LoadError::InvalidLayout);
            }
            match seen.get_mut(card.index()) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(LoadError::InvalidLayout),
            }
        }
        if seen.iter().all(|&placed| placed) {
            Ok(())
        } else {
            Err(LoadError::InvalidLayout)
        }
    }

    /// Replay both stacks against a scratch copy of `table` laid out as
    /// saved, checking every primitive's starting state.
    ///
    /// The undo stack is undone newest first then redone; the redo stack is
    /// redone newest first then undone. Either way the scratch table ends up
    /// back at the saved layout.
    pub fn verify_history(&self, table: &Table) -> Result<(), LoadError> {
        let mut scratch = table.detached();
        scratch.apply_layout(&self.face_up, &self.piles);

        for entry in self.undo.iter().rev() {
            entry.try_undo(&mut scratch)?;
        }
        for entry in &self.undo {
            entry.try_redo(&mut scratch)?;
        }
        for entry in self.redo.iter().rev() {
            entry.try_redo(&mut scratch)?;
        }
        for entry in &self.redo {
            entry.try_undo(&mut scratch)?;
        }
        Ok(())
    }

    /// Validate everything that can be checked without touching `table`.
    pub fn check(&self, table: &Table) -> Result<(), LoadError> {
        self.validate_layout(table)?;
        self.verify_history(table)
    }

    /// Overwrite the table's layout and rebuild the history.
    ///
    /// Call only after `check` succeeded against the same table.
    pub(crate) fn apply(self, table: &mut Table) -> UndoHistory {
        table.apply_layout(&self.face_up, &self.piles);
        UndoHistory::from_stacks(self.undo, self.redo)
    }
}

fn read_stack(context: &mut SerializationContext) -> Result<Vec<CompoundOperation>, LoadError> {
    let count = context.read_count()?;
    let mut stack = Vec::with_capacity(count);
    for _ in 0..count {
        if context.read_kind()? != OperationKind::Compound {
            return Err(LoadError::NotCompound);
        }
        stack.push(CompoundOperation::read_compound(context)?);
    }
    Ok(stack)
}

//! Undo and redo stacks.

use im::Vector;

use crate::piles::Table;

use super::compound::CompoundOperation;

/// Linear undo history of committed transactions.
///
/// Committing a new transaction discards the redo stack. Both stacks are
/// persistent vectors so a snapshot of the history is a cheap clone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndoHistory {
    undo_stack: Vector<CompoundOperation>,
    redo_stack: Vector<CompoundOperation>,
}

impl UndoHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from loaded stacks, bottom entry first.
    pub(crate) fn from_stacks(undo: Vec<CompoundOperation>, redo: Vec<CompoundOperation>) -> Self {
        Self {
            undo_stack: undo.into_iter().collect(),
            redo_stack: redo.into_iter().collect(),
        }
    }

    /// Push a committed transaction. Empty transactions are dropped and
    /// leave the redo stack intact.
    ///
    /// Returns whether anything was pushed.
    pub fn commit(&mut self, op: CompoundOperation) -> bool {
        if op.is_empty() {
            return false;
        }
        self.undo_stack.push_back(op);
        self.redo_stack.clear();
        true
    }

    /// Revert the most recent transaction. Returns `false` with nothing to undo.
    pub fn undo(&mut self, table: &mut Table) -> bool {
        match self.undo_stack.pop_back() {
            Some(op) => {
                op.undo(table);
                self.redo_stack.push_back(op);
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone transaction.
    pub fn redo(&mut self, table: &mut Table) -> bool {
        match self.redo_stack.pop_back() {
            Some(op) => {
                op.redo(table);
                self.undo_stack.push_back(op);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo stack, oldest first.
    pub fn undo_entries(&self) -> impl DoubleEndedIterator<Item = &CompoundOperation> {
        self.undo_stack.iter()
    }

    /// Redo stack, oldest first (the next redo is last).
    pub fn redo_entries(&self) -> impl DoubleEndedIterator<Item = &CompoundOperation> {
        self.redo_stack.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Colour, Rank, Suit};
    use crate::core::{CardId, PileId};

    fn moved(table: &mut Table, pile: PileId, card: CardId) -> CompoundOperation {
        assert!(table.open_transaction());
        table.push(pile, card);
        table.close_transaction()
    }

    #[test]
    fn test_commit_discards_redo() {
        let mut table = Table::new();
        let p = table.add_pile();
        let q = table.add_pile();
        let a = table.create_card(p, Suit::Clubs, Colour::Black, Rank::Ace);
        let b = table.create_card(p, Suit::Clubs, Colour::Black, Rank::Two);
        let mut history = UndoHistory::new();

        assert!(history.commit(moved(&mut table, q, b)));
        assert!(history.undo(&mut table));
        assert!(history.can_redo());

        assert!(history.commit(moved(&mut table, q, a)));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_empty_commit_keeps_redo() {
        let mut table = Table::new();
        let p = table.add_pile();
        let q = table.add_pile();
        let a = table.create_card(p, Suit::Clubs, Colour::Black, Rank::Ace);
        let mut history = UndoHistory::new();

        history.commit(moved(&mut table, q, a));
        history.undo(&mut table);

        assert!(!history.commit(CompoundOperation::new()));
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_undo_redo_on_empty_stacks() {
        let mut table = Table::new();
        let mut history = UndoHistory::new();
        assert!(!history.undo(&mut table));
        assert!(!history.redo(&mut table));
    }

    #[test]
    fn test_undo_then_redo_restores_table() {
        let mut table = Table::new();
        let p = table.add_pile();
        let q = table.add_pile();
        let a = table.create_card(p, Suit::Hearts, Colour::Red, Rank::Ace);
        let mut history = UndoHistory::new();

        history.commit(moved(&mut table, q, a));
        history.undo(&mut table);
        assert_eq!(table.card(a).pile(), p);
        history.redo(&mut table);
        assert_eq!(table.card(a).pile(), q);
        assert_eq!(history.undo_entries().count(), 1);
        assert_eq!(history.redo_entries().count(), 0);
    }
}

//! Undoable operations.
//!
//! Every change to card placement, card orientation or pile fan is captured
//! as an `Operation`: an immutable record of the state before and after one
//! primitive mutation. Operations are the unit of undo, redo and
//! persistence.
//!
//! ## Closed Set
//!
//! The set of operation kinds is fixed. Each kind has a stable small-integer
//! tag (`OperationKind`) and a deserializer function; save data stores the
//! tag in front of each payload so loading dispatches on the tag alone.
//!
//! | Kind | Tag | Payload |
//! |---|---|---|
//! | `Compound` | 0 | count, then tag + payload per child |
//! | `Flip` | 1 | card, old face-up, new face-up |
//! | `Insert` | 2 | card, old pile, old index, new pile, new index |
//! | `MaxFan` | 3 | pile, old max fan, new max fan |

use crate::core::{CardId, PileId};
use crate::piles::Table;
use crate::serialization::{Deserializer, LoadError, SerializationContext};

use super::compound::CompoundOperation;

/// Tag identifying which kind of operation a payload belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Compound,
    Flip,
    Insert,
    MaxFan,
}

impl OperationKind {
    /// Every kind, in deserializer registration order.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Compound,
        OperationKind::Flip,
        OperationKind::Insert,
        OperationKind::MaxFan,
    ];

    /// Function that reads this kind's payload back into an operation.
    #[must_use]
    pub fn deserializer(self) -> Deserializer {
        match self {
            OperationKind::Compound => CompoundOperation::read,
            OperationKind::Flip => CardFlip::read,
            OperationKind::Insert => PileInsert::read,
            OperationKind::MaxFan => PileMaxFan::read,
        }
    }
}

/// One undoable change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Flip(CardFlip),
    Insert(PileInsert),
    MaxFan(PileMaxFan),
    Compound(CompoundOperation),
}

impl Operation {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Flip(_) => OperationKind::Flip,
            Operation::Insert(_) => OperationKind::Insert,
            Operation::MaxFan(_) => OperationKind::MaxFan,
            Operation::Compound(_) => OperationKind::Compound,
        }
    }

    /// Deserializer that reconstructs this operation from its payload.
    #[must_use]
    pub fn deserializer(&self) -> Deserializer {
        self.kind().deserializer()
    }

    /// Revert the change.
    pub(crate) fn undo(&self, table: &mut Table) {
        match self {
            Operation::Flip(op) => op.undo(table),
            Operation::Insert(op) => op.undo(table),
            Operation::MaxFan(op) => op.undo(table),
            Operation::Compound(op) => op.undo(table),
        }
    }

    /// Apply the change.
    pub(crate) fn redo(&self, table: &mut Table) {
        match self {
            Operation::Flip(op) => op.redo(table),
            Operation::Insert(op) => op.redo(table),
            Operation::MaxFan(op) => op.redo(table),
            Operation::Compound(op) => op.redo(table),
        }
    }

    /// Revert the change if the table is in the state the change left it in.
    pub(crate) fn try_undo(&self, table: &mut Table) -> Result<(), LoadError> {
        match self {
            Operation::Flip(op) => op.try_undo(table),
            Operation::Insert(op) => op.try_undo(table),
            Operation::MaxFan(op) => op.try_undo(table),
            Operation::Compound(op) => op.try_undo(table),
        }
    }

    /// Apply the change if the table is in the state the change expects.
    pub(crate) fn try_redo(&self, table: &mut Table) -> Result<(), LoadError> {
        match self {
            Operation::Flip(op) => op.try_redo(table),
            Operation::Insert(op) => op.try_redo(table),
            Operation::MaxFan(op) => op.try_redo(table),
            Operation::Compound(op) => op.try_redo(table),
        }
    }

    /// Write the payload only; the caller writes the tag.
    pub(crate) fn write_payload(&self, context: &mut SerializationContext) {
        match self {
            Operation::Flip(op) => op.write(context),
            Operation::Insert(op) => op.write(context),
            Operation::MaxFan(op) => op.write(context),
            Operation::Compound(op) => op.write(context),
        }
    }
}

fn require(condition: bool) -> Result<(), LoadError> {
    if condition {
        Ok(())
    } else {
        Err(LoadError::InconsistentHistory)
    }
}

/// A card turned face up or face down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardFlip {
    pub card: CardId,
    pub old_face_up: bool,
    pub new_face_up: bool,
}

impl CardFlip {
    pub(crate) fn undo(&self, table: &mut Table) {
        table.set_face_up_raw(self.card, self.old_face_up);
    }

    pub(crate) fn redo(&self, table: &mut Table) {
        table.set_face_up_raw(self.card, self.new_face_up);
    }

    fn try_undo(&self, table: &mut Table) -> Result<(), LoadError> {
        require(table.card(self.card).face_up() == self.new_face_up)?;
        self.undo(table);
        Ok(())
    }

    fn try_redo(&self, table: &mut Table) -> Result<(), LoadError> {
        require(table.card(self.card).face_up() == self.old_face_up)?;
        self.redo(table);
        Ok(())
    }

    fn write(&self, context: &mut SerializationContext) {
        context.write_card(self.card);
        context.write_bool(self.old_face_up);
        context.write_bool(self.new_face_up);
    }

    fn read(context: &mut SerializationContext) -> Result<Operation, LoadError> {
        Ok(Operation::Flip(CardFlip {
            card: context.read_card()?,
            old_face_up: context.read_bool()?,
            new_face_up: context.read_bool()?,
        }))
    }
}

/// A card moved from one pile position to another.
///
/// Both indices are resting positions: `old_index` is where the card sat
/// before, `new_index` is where it sits after. That makes `undo` and `redo`
/// exact mirrors even for moves within a single pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PileInsert {
    pub card: CardId,
    pub old_pile: PileId,
    pub old_index: usize,
    pub new_pile: PileId,
    pub new_index: usize,
}

impl PileInsert {
    pub(crate) fn undo(&self, table: &mut Table) {
        table.place(self.card, self.old_pile, self.old_index);
    }

    pub(crate) fn redo(&self, table: &mut Table) {
        table.place(self.card, self.new_pile, self.new_index);
    }

    /// Whether `card` sits at `(pile, index)` and `target_index` is a legal
    /// resting position in `target` once the card has been lifted out.
    fn can_move(
        &self,
        table: &Table,
        pile: PileId,
        index: usize,
        target: PileId,
        target_index: usize,
    ) -> bool {
        let card = table.card(self.card);
        if card.pile() != pile || card.pile_index() != index {
            return false;
        }
        let mut room = table.pile(target).len();
        if target == pile {
            room -= 1;
        }
        target_index <= room
    }

    fn try_undo(&self, table: &mut Table) -> Result<(), LoadError> {
        require(self.can_move(table, self.new_pile, self.new_index, self.old_pile, self.old_index))?;
        self.undo(table);
        Ok(())
    }

    fn try_redo(&self, table: &mut Table) -> Result<(), LoadError> {
        require(self.can_move(table, self.old_pile, self.old_index, self.new_pile, self.new_index))?;
        self.redo(table);
        Ok(())
    }

    fn write(&self, context: &mut SerializationContext) {
        context.write_card(self.card);
        context.write_pile(self.old_pile);
        context.write_index(self.old_index);
        context.write_pile(self.new_pile);
        context.write_index(self.new_index);
    }

    fn read(context: &mut SerializationContext) -> Result<Operation, LoadError> {
        Ok(Operation::Insert(PileInsert {
            card: context.read_card()?,
            old_pile: context.read_pile()?,
            old_index: context.read_index()?,
            new_pile: context.read_pile()?,
            new_index: context.read_index()?,
        }))
    }
}

/// A pile's fan hint changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PileMaxFan {
    pub pile: PileId,
    pub old_max_fan: u32,
    pub new_max_fan: u32,
}

impl PileMaxFan {
    pub(crate) fn undo(&self, table: &mut Table) {
        table.set_max_fan_raw(self.pile, self.old_max_fan);
    }

    pub(crate) fn redo(&self, table: &mut Table) {
        table.set_max_fan_raw(self.pile, self.new_max_fan);
    }

    fn try_undo(&self, table: &mut Table) -> Result<(), LoadError> {
        require(table.pile(self.pile).max_fan() == self.new_max_fan)?;
        self.undo(table);
        Ok(())
    }

    fn try_redo(&self, table: &mut Table) -> Result<(), LoadError> {
        require(table.pile(self.pile).max_fan() == self.old_max_fan)?;
        self.redo(table);
        Ok(())
    }

    fn write(&self, context: &mut SerializationContext) {
        context.write_pile(self.pile);
        context.write(i64::from(self.old_max_fan));
        context.write(i64::from(self.new_max_fan));
    }

    fn read(context: &mut SerializationContext) -> Result<Operation, LoadError> {
        Ok(Operation::MaxFan(PileMaxFan {
            pile: context.read_pile()?,
            old_max_fan: context.read_max_fan()?,
            new_max_fan: context.read_max_fan()?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Colour, Rank, Suit};

    fn table_with_pair() -> (Table, PileId, PileId, CardId, CardId) {
        let mut table = Table::new();
        let p = table.add_pile();
        let q = table.add_pile();
        let a = table.create_card(p, Suit::Clubs, Colour::Black, Rank::Ace);
        let b = table.create_card(p, Suit::Clubs, Colour::Black, Rank::Two);
        (table, p, q, a, b)
    }

    #[test]
    fn test_kind_matches_variant() {
        let flip = Operation::Flip(CardFlip {
            card: CardId::new(0),
            old_face_up: false,
            new_face_up: true,
        });
        assert_eq!(flip.kind(), OperationKind::Flip);
        assert_eq!(
            Operation::Compound(CompoundOperation::new()).kind(),
            OperationKind::Compound
        );
    }

    #[test]
    fn test_flip_undo_redo_idempotent() {
        let (mut table, _, _, a, _) = table_with_pair();
        let op = CardFlip {
            card: a,
            old_face_up: false,
            new_face_up: true,
        };

        for _ in 0..3 {
            op.redo(&mut table);
            assert!(table.card(a).face_up());
            op.undo(&mut table);
            assert!(!table.card(a).face_up());
        }
    }

    #[test]
    fn test_insert_undo_restores_position() {
        let (mut table, p, q, a, b) = table_with_pair();
        let op = PileInsert {
            card: a,
            old_pile: p,
            old_index: 0,
            new_pile: q,
            new_index: 0,
        };

        op.redo(&mut table);
        assert_eq!(table.card(a).pile(), q);
        assert_eq!(table.card(b).pile_index(), 0);

        op.undo(&mut table);
        assert_eq!(table.card(a).pile(), p);
        assert_eq!(table.card(a).pile_index(), 0);
        assert_eq!(table.card(b).pile_index(), 1);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_try_redo_rejects_wrong_start() {
        let (mut table, p, q, a, _) = table_with_pair();
        let op = PileInsert {
            card: a,
            old_pile: p,
            old_index: 1,
            new_pile: q,
            new_index: 0,
        };
        assert!(matches!(op.try_redo(&mut table), Err(LoadError::InconsistentHistory)));
        assert_eq!(table.card(a).pile(), p);
    }

    #[test]
    fn test_try_redo_rejects_index_past_end() {
        let (mut table, p, q, a, _) = table_with_pair();
        let op = PileInsert {
            card: a,
            old_pile: p,
            old_index: 0,
            new_pile: q,
            new_index: 1,
        };
        assert!(op.try_redo(&mut table).is_err());
    }

    #[test]
    fn test_try_undo_same_pile() {
        let (mut table, p, _, a, b) = table_with_pair();
        let op = PileInsert {
            card: a,
            old_pile: p,
            old_index: 0,
            new_pile: p,
            new_index: 1,
        };

        op.try_redo(&mut table).unwrap();
        assert_eq!(table.pile(p).at(0), b);
        op.try_undo(&mut table).unwrap();
        assert_eq!(table.pile(p).at(0), a);
    }

    #[test]
    fn test_max_fan_checks_current_value() {
        let (mut table, p, _, _, _) = table_with_pair();
        let op = PileMaxFan {
            pile: p,
            old_max_fan: 999,
            new_max_fan: 2,
        };

        assert!(op.try_undo(&mut table).is_err());
        op.try_redo(&mut table).unwrap();
        assert_eq!(table.pile(p).max_fan(), 2);
        op.try_undo(&mut table).unwrap();
        assert_eq!(table.pile(p).max_fan(), 999);
    }
}

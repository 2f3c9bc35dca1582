//! Compound operations: one user-visible transaction.

use crate::piles::Table;
use crate::serialization::{LoadError, SerializationContext};

use super::operation::Operation;

/// An ordered batch of operations undone and redone as one unit.
///
/// `undo` reverts children last to first; `redo` reapplies them first to
/// last. A compound may in principle contain another compound, but the
/// engine only ever builds one level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundOperation {
    ops: Vec<Operation>,
}

impl CompoundOperation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of child operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Child operations in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.ops.iter()
    }

    pub(crate) fn push(&mut self, op: Operation) {
        self.ops.push(op);
    }

    pub(crate) fn undo(&self, table: &mut Table) {
        for op in self.ops.iter().rev() {
            op.undo(table);
        }
    }

    pub(crate) fn redo(&self, table: &mut Table) {
        for op in &self.ops {
            op.redo(table);
        }
    }

    pub(crate) fn try_undo(&self, table: &mut Table) -> Result<(), LoadError> {
        self.ops.iter().rev().try_for_each(|op| op.try_undo(table))
    }

    pub(crate) fn try_redo(&self, table: &mut Table) -> Result<(), LoadError> {
        self.ops.iter().try_for_each(|op| op.try_redo(table))
    }

    pub(crate) fn write(&self, context: &mut SerializationContext) {
        context.write(self.ops.len() as i64);
        for op in &self.ops {
            context.write_operation(op);
        }
    }

    pub(crate) fn read(context: &mut SerializationContext) -> Result<Operation, LoadError> {
        Self::read_compound(context).map(Operation::Compound)
    }

    /// Read a compound payload (count, then tagged children).
    pub(crate) fn read_compound(context: &mut SerializationContext) -> Result<Self, LoadError> {
        context.enter_nested()?;
        let count = context.read_count()?;
        let mut ops = Vec::with_capacity(count);
        for _ in 0..count {
            ops.push(context.read_operation()?);
        }
        context.leave_nested();
        Ok(Self { ops })
    }
}

impl FromIterator<Operation> for CompoundOperation {
    fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

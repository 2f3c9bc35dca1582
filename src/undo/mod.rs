//! Undoable operations and the undo history.

pub mod compound;
pub mod history;
pub mod operation;

pub use compound::CompoundOperation;
pub use history::UndoHistory;
pub use operation::{CardFlip, Operation, OperationKind, PileInsert, PileMaxFan};

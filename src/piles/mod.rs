//! Piles and the table arena that owns all cards and piles.
//!
//! The table plays the part a zone manager plays in larger engines: it
//! tracks where every card lives and moves cards between ordered piles,
//! but every move is expressed as an undoable operation.

pub mod pile;
pub mod table;

pub use pile::{Pile, MAX_FAN};
pub use table::{Table, TableObserver};

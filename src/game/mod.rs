//! The game transaction engine.

pub mod engine;
pub mod listener;
pub mod transaction;

pub use engine::Game;
pub use listener::GameListener;
pub use transaction::{Transaction, TransactionKind, TransactionSteps};

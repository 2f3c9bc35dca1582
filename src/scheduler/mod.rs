//! Queued, paced execution of player moves.

pub mod config;
pub mod queue;
pub mod store;

pub use config::PacingConfig;
pub use queue::{Move, MoveQueue, MoveScheduler};
pub use store::{MemoryStore, SaveStore, StoreError};

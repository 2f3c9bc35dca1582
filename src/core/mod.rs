//! Core engine types: arena handles, RNG, pacing hints.
//!
//! This module contains the fundamental building blocks shared by every
//! other module. Nothing here knows about undo history or serialization.

pub mod hint;
pub mod ids;
pub mod rng;

pub use hint::DelayHint;
pub use ids::{CardId, PileId, TableId};
pub use rng::GameRng;

//! Simple stock-and-foundations solitaire for exercising the engine.
//!
//! A minimal rule set that drives every part of the engine:
//! - One 52-card deck dealt face down into the stock
//! - Drawing turns 1 to 5 cards onto the waste, fanned
//! - Waste cards build up by suit from ace to king on four foundations
//! - An exhausted stock can be refilled from the waste, optionally limited
//!
//! With single-card draws and unlimited restocks every deal is winnable.

mod game;

pub use game::{SimpleOptions, SimpleSolitaire};

//! Reference rule sets.

pub mod simple;

//! Rule strategy interface and step sequences.

pub mod engine;
pub mod steps;

pub use engine::{DragInfo, Rules};
pub use steps::{Step, StepFn, Steps};

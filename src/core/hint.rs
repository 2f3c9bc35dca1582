//! Pacing hints yielded between the steps of a rule action.

use serde::{Deserialize, Serialize};

/// How long a consumer should visually pause before resuming a step sequence.
///
/// The engine attaches no timing to these; the scheduler maps them to
/// durations via `PacingConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayHint {
    /// No delay at all.
    None,
    /// A very short delay.
    Quick,
    /// Long enough for the previous card transition to complete.
    OneByOne,
    /// Long enough that the player notices a slight pause.
    Settle,
}

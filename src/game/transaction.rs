use crate::core::DelayHint;
use crate::rules::{Rules, Steps};

use super::engine::Game;

/// What a transaction commits as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    /// A player action: committed to the undo stack.
    Action,
    /// A new deal: the history is cleared afterwards.
    Restart,
}

/// An open transaction on a `Game`.
///
/// Drive it with `Game::advance` until that returns `None`, or hand it to
/// `Game::complete`. The game rejects every other action while this is
/// unfinished.
#[must_use = "a transaction stays open until it is driven to completion"]
pub struct Transaction<R: Rules> {
    pub(crate) serial: u64,
    pub(crate) kind: TransactionKind,
    pub(crate) steps: Steps<R>,
    pub(crate) finished: bool,
}

impl<R: Rules> Transaction<R> {
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Whether every step has run and the transaction was committed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<R: Rules> std::fmt::Debug for Transaction<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("serial", &self.serial)
            .field("kind", &self.kind)
            .field("pending", &self.steps.len())
            .field("finished", &self.finished)
            .finish()
    }
}

/// Iterator over the pacing hints of a transaction; commits when exhausted.
pub struct TransactionSteps<'a, R: Rules> {
    pub(crate) game: &'a mut Game<R>,
    pub(crate) transaction: Transaction<R>,
}

impl<R: Rules> Iterator for TransactionSteps<'_, R> {
    type Item = DelayHint;

    fn next(&mut self) -> Option<DelayHint> {
        self.game.advance(&mut self.transaction)
    }
}

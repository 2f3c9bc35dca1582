//! Sequential move execution.
//!
//! The game accepts one transaction at a time, so moves are queued and
//! drained strictly in order. While a move's steps pause, other code may
//! push more moves onto the shared queue; they run after the current move
//! finishes, never interleaved with it.
//!
//! The scheduler is single-threaded: the queue handle is `Rc`-shared and the
//! drain future is `!Send`. Run it on a current-thread runtime or inside a
//! `tokio::task::LocalSet`.
//!
//! Dropping a `drain` future mid-pause (a `select!`, a timeout, an aborted
//! task) leaves the move it was running open on the game. The scheduler
//! keeps that transaction, and the next `drain` finishes it before taking
//! the following move.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, error, trace, warn};

use crate::core::{CardId, PileId};
use crate::game::{Game, Transaction};
use crate::rules::Rules;

use super::config::PacingConfig;
use super::store::{MemoryStore, SaveStore};

/// A queued player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Restart(u64),
    Undo,
    Redo,
    PilePrimary(PileId),
    PileSecondary(PileId),
    CardPrimary(CardId),
    CardSecondary(CardId),
    Drop { card: CardId, pile: PileId },
}

impl Move {
    /// Open the transaction for this move. `None` for undo and redo, which
    /// replay history directly, and when the game is busy.
    fn begin<R: Rules>(self, game: &mut Game<R>) -> Option<Transaction<R>> {
        match self {
            Move::Restart(seed) => game.restart(seed),
            Move::Undo | Move::Redo => None,
            Move::PilePrimary(pile) => game.pile_primary(pile),
            Move::PileSecondary(pile) => game.pile_secondary(pile),
            Move::CardPrimary(card) => game.card_primary(card),
            Move::CardSecondary(card) => game.card_secondary(card),
            Move::Drop { card, pile } => game.drop_card(card, pile),
        }
    }
}

/// Shared FIFO of pending moves.
#[derive(Clone, Debug, Default)]
pub struct MoveQueue {
    inner: Rc<RefCell<VecDeque<Move>>>,
}

impl MoveQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move behind everything already queued.
    pub fn push(&self, mv: Move) {
        self.inner.borrow_mut().push_back(mv);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    fn front(&self) -> Option<Move> {
        self.inner.borrow().front().copied()
    }

    fn pop_front(&self) -> Option<Move> {
        self.inner.borrow_mut().pop_front()
    }
}

/// Drains a `MoveQueue` into a `Game`, pacing each move and persisting the
/// game after it.
pub struct MoveScheduler<R: Rules, S: SaveStore = MemoryStore> {
    game: Game<R>,
    queue: MoveQueue,
    pacing: PacingConfig,
    store: S,
    /// The head move's transaction while it is being paced.
    current: Option<Transaction<R>>,
    /// Pauses taken so far by `current`.
    wait_count: u32,
}

impl<R: Rules, S: SaveStore> MoveScheduler<R, S> {
    pub fn new(game: Game<R>, store: S, pacing: PacingConfig) -> Self {
        Self {
            game,
            queue: MoveQueue::new(),
            pacing,
            store,
            current: None,
            wait_count: 0,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    /// Direct access for pure queries and wiring. Mutating the game while a
    /// drain is in progress is refused by the game itself.
    pub fn game_mut(&mut self) -> &mut Game<R> {
        &mut self.game
    }

    /// A handle that pushes onto this scheduler's queue.
    #[must_use]
    pub fn queue(&self) -> MoveQueue {
        self.queue.clone()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    pub fn submit(&self, mv: Move) {
        self.queue.push(mv);
    }

    /// Whether a move was interrupted mid-pause and is waiting for the next
    /// `drain` to finish it.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.current.is_some()
    }

    /// Resume the saved game if the store holds valid save data; otherwise
    /// queue a fresh deal from `seed`. Returns whether a save was resumed.
    ///
    /// Panics if an interrupted move is still open.
    pub fn start(&mut self, seed: u64) -> bool {
        assert!(self.current.is_none(), "cannot start while a move is interrupted");
        match self.store.load() {
            Ok(Some(text)) if self.game.deserialize(&text) => {
                debug!("resumed saved game");
                return true;
            }
            Ok(_) => {}
            Err(error) => warn!(%error, "could not read save store"),
        }
        self.queue.push(Move::Restart(seed));
        false
    }

    /// Run queued moves until the queue is empty, including moves pushed
    /// while draining. An interrupted move is finished first.
    pub async fn drain(&mut self) {
        // the head stays queued while it runs so `len` counts it
        while let Some(mv) = self.queue.front() {
            if self.current.is_none() {
                self.begin(mv);
            } else {
                debug!(?mv, "resuming interrupted move");
            }
            self.pace().await;
            self.queue.pop_front();
            self.persist();
        }
    }

    /// Apply undo and redo directly; open the transaction of anything else.
    fn begin(&mut self, mv: Move) {
        match mv {
            Move::Undo => {
                self.game.undo();
            }
            Move::Redo => {
                self.game.redo();
            }
            _ => match mv.begin(&mut self.game) {
                Some(transaction) => {
                    self.current = Some(transaction);
                    self.wait_count = 0;
                }
                None => debug!(?mv, "move rejected"),
            },
        }
    }

    /// Drive `current` to completion, sleeping through its pauses.
    async fn pace(&mut self) {
        loop {
            let Some(transaction) = self.current.as_mut() else {
                return;
            };
            let Some(hint) = self.game.advance(transaction) else {
                self.current = None;
                return;
            };
            if self.queue.len() > 1 {
                self.wait_count = self.wait_count.max(self.pacing.backlog_floor);
            }
            let delay = self.pacing.delay(hint, self.wait_count);
            self.wait_count = self.wait_count.saturating_add(1);
            if !delay.is_zero() {
                trace!(?hint, ?delay, "pacing");
                tokio::time::sleep(delay).await;
            }
        }
    }

    fn persist(&mut self) {
        let data = self.game.serialize();
        if let Err(error) = self.store.save(&data) {
            error!(%error, "failed to persist game");
        }
    }

    /// Tear down, returning the game and the store. An interrupted move is
    /// finished without pauses first, so the game comes back idle.
    pub fn into_parts(mut self) -> (Game<R>, S) {
        if let Some(transaction) = self.current.take() {
            self.game.complete(transaction);
            self.queue.pop_front();
            self.persist();
        }
        (self.game, self.store)
    }
}

//! The transaction engine.
//!
//! `Game<R>` owns the table, the undo history and the rule set. Every
//! state-changing player action goes through the same cycle:
//!
//! 1. validate the entity handles (panics on a foreign handle),
//! 2. refuse the action if a transaction is already open,
//! 3. ask the rules for a step sequence and open a transaction,
//! 4. let the caller drive the steps with `advance`, pausing on each hint,
//! 5. commit: push the recorded compound onto the undo stack, or drop it if
//!    nothing changed, then re-check the win condition.
//!
//! Undo and redo bypass the rules entirely and replay recorded operations.
//!
//! ```
//! use solitaire_core::game::Game;
//! use solitaire_core::games::simple::{SimpleOptions, SimpleSolitaire};
//!
//! let mut game = Game::new(|table| SimpleSolitaire::new(table, SimpleOptions::default()));
//! let deal = game.restart(7).expect("no transaction is open");
//! game.complete(deal);
//!
//! assert_eq!(game.games_started(), 1);
//! assert!(!game.can_undo());
//!
//! let stock = game.rules().stock();
//! if let Some(draw) = game.pile_primary(stock) {
//!     game.complete(draw);
//!     assert!(game.can_undo());
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, trace, warn};

use crate::core::{CardId, DelayHint, GameRng, PileId};
use crate::piles::{Table, TableObserver};
use crate::rules::{DragInfo, Rules, Steps};
use crate::serialization::{LoadError, SaveData, SerializationContext};
use crate::undo::UndoHistory;

use super::listener::GameListener;
use super::transaction::{Transaction, TransactionKind, TransactionSteps};

/// Transaction serials are unique across every game in the process.
static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// A solitaire game: table, history and rule set.
pub struct Game<R: Rules> {
    table: Table,
    rules: R,
    history: UndoHistory,
    won: bool,
    games_started: u32,
    games_won: u32,
    /// Serial of the transaction currently open, if any.
    open: Option<u64>,
    listener: Option<Box<dyn GameListener>>,
    can_undo: bool,
    can_redo: bool,
}

impl<R: Rules + std::fmt::Debug> std::fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("table", &self.table)
            .field("rules", &self.rules)
            .field("history", &self.history)
            .field("won", &self.won)
            .field("games_started", &self.games_started)
            .field("games_won", &self.games_won)
            .field("open", &self.open)
            .finish()
    }
}

impl<R: Rules> Game<R> {
    /// Build a game. `build` creates the piles and cards on the empty table
    /// and returns the rule set that owns their handles.
    ///
    /// `build` must create cards and piles in the same order every time:
    /// save data refers to them by position.
    pub fn new(build: impl FnOnce(&mut Table) -> R) -> Self {
        let mut table = Table::new();
        let rules = build(&mut table);
        Self {
            table,
            rules,
            history: UndoHistory::new(),
            won: false,
            games_started: 0,
            games_won: 0,
            open: None,
            listener: None,
            can_undo: false,
            can_redo: false,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    #[must_use]
    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    /// Whether a transaction is open and every other action is refused.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.open.is_some()
    }

    /// Cards the rules want celebrated after a win.
    #[must_use]
    pub fn won_cards(&self) -> Vec<CardId> {
        self.rules.won_cards(&self.table)
    }

    // === Wiring ===

    pub fn set_listener(&mut self, listener: Box<dyn GameListener>) {
        self.listener = Some(listener);
    }

    pub fn set_table_observer(&mut self, observer: Box<dyn TableObserver>) {
        self.table.set_observer(observer);
    }

    // === Actions ===

    /// Deal a new game from `seed`.
    pub fn restart(&mut self, seed: u64) -> Option<Transaction<R>> {
        if self.is_busy() {
            return None;
        }
        self.games_started += 1;
        let started = self.games_started;
        self.notify(|l| l.games_started_changed(started));
        self.set_won(false);

        debug!(seed, games_started = started, "restarting");
        let steps = self.rules.restart(&self.table, GameRng::new(seed));
        self.begin(TransactionKind::Restart, steps)
    }

    pub fn pile_primary(&mut self, pile: PileId) -> Option<Transaction<R>> {
        self.table.assert_pile(pile);
        if self.is_busy() {
            return None;
        }
        let steps = self.rules.pile_primary(&self.table, pile);
        self.begin(TransactionKind::Action, steps)
    }

    pub fn pile_secondary(&mut self, pile: PileId) -> Option<Transaction<R>> {
        self.table.assert_pile(pile);
        if self.is_busy() {
            return None;
        }
        let steps = self.rules.pile_secondary(&self.table, pile);
        self.begin(TransactionKind::Action, steps)
    }

    pub fn card_primary(&mut self, card: CardId) -> Option<Transaction<R>> {
        self.table.assert_card(card);
        if self.is_busy() {
            return None;
        }
        let steps = self.rules.card_primary(&self.table, card);
        self.begin(TransactionKind::Action, steps)
    }

    pub fn card_secondary(&mut self, card: CardId) -> Option<Transaction<R>> {
        self.table.assert_card(card);
        if self.is_busy() {
            return None;
        }
        let steps = self.rules.card_secondary(&self.table, card);
        self.begin(TransactionKind::Action, steps)
    }

    /// Drop `card` on `pile` after a drag.
    pub fn drop_card(&mut self, card: CardId, pile: PileId) -> Option<Transaction<R>> {
        self.table.assert_card(card);
        self.table.assert_pile(pile);
        if self.is_busy() {
            return None;
        }
        let steps = self.rules.drop_card(&self.table, card, pile);
        self.begin(TransactionKind::Action, steps)
    }

    /// Whether `card` can be lifted, and what comes with it. Pure.
    #[must_use]
    pub fn can_drag(&self, card: CardId) -> DragInfo {
        self.table.assert_card(card);
        self.rules.can_drag(&self.table, card)
    }

    /// Whether dropping `card` on `pile` would be accepted. Pure.
    #[must_use]
    pub fn preview_drop(&self, card: CardId, pile: PileId) -> bool {
        self.table.assert_card(card);
        self.table.assert_pile(pile);
        self.rules.preview_drop(&self.table, card, pile)
    }

    fn begin(&mut self, kind: TransactionKind, steps: Steps<R>) -> Option<Transaction<R>> {
        if !self.table.open_transaction() {
            return None;
        }
        let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        self.open = Some(serial);
        Some(Transaction {
            serial,
            kind,
            steps,
            finished: false,
        })
    }

    // === Driving transactions ===

    /// Run `transaction` up to its next pause and return the pause's hint.
    /// Returns `None` once the transaction has been committed.
    ///
    /// Panics if `transaction` was opened by a different game.
    pub fn advance(&mut self, transaction: &mut Transaction<R>) -> Option<DelayHint> {
        if transaction.finished {
            return None;
        }
        assert_eq!(
            self.open,
            Some(transaction.serial),
            "transaction {} is not open on this game",
            transaction.serial
        );

        if let Some(hint) = transaction.steps.resume(&mut self.rules, &mut self.table) {
            trace!(?hint, "pause");
            return Some(hint);
        }

        self.commit(transaction.kind);
        transaction.finished = true;
        None
    }

    /// Run `transaction` to completion without pausing.
    pub fn complete(&mut self, mut transaction: Transaction<R>) {
        while self.advance(&mut transaction).is_some() {}
    }

    /// Iterate over the pacing hints of `transaction`; it commits when the
    /// iterator is exhausted.
    pub fn steps(&mut self, transaction: Transaction<R>) -> TransactionSteps<'_, R> {
        TransactionSteps {
            game: self,
            transaction,
        }
    }

    fn commit(&mut self, kind: TransactionKind) {
        let recorded = self.table.close_transaction();
        self.open = None;

        match kind {
            TransactionKind::Action => {
                let children = recorded.len();
                if self.history.commit(recorded) {
                    debug!(children, "committed transaction");
                } else {
                    debug!("discarded empty transaction");
                }
            }
            TransactionKind::Restart => {
                self.history.clear();
                debug!(operations = recorded.len(), "dealt new game");
            }
        }

        let won = self.rules.is_won(&self.table);
        if won && !self.won {
            self.games_won += 1;
            self.history.clear();
            let games_won = self.games_won;
            info!(games_won, games_started = self.games_started, "game won");
            self.notify(|l| l.games_won_changed(games_won));
        }
        self.set_won(won);
        self.sync_history_flags();
    }

    // === History ===

    /// Revert the last committed action. Returns `false` when there is
    /// nothing to undo or a transaction is open.
    pub fn undo(&mut self) -> bool {
        if self.is_busy() || !self.history.undo(&mut self.table) {
            return false;
        }
        debug!(remaining = self.history.undo_len(), "undo");
        self.sync_history_flags();
        true
    }

    /// Reapply the last undone action. Returns `false` when there is
    /// nothing to redo or a transaction is open.
    pub fn redo(&mut self) -> bool {
        if self.is_busy() || !self.history.redo(&mut self.table) {
            return false;
        }
        debug!(remaining = self.history.redo_len(), "redo");
        self.sync_history_flags();
        true
    }

    // === Persistence ===

    /// Full state as a JSON integer array.
    ///
    /// Panics while a transaction is open.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.save_context().to_json()
    }

    /// Full state in the bincode form.
    pub fn serialize_binary(&self) -> bincode::Result<Vec<u8>> {
        self.save_context().to_bytes()
    }

    /// Load state written by `serialize`. On error the game is unchanged.
    ///
    /// Panics while a transaction is open.
    pub fn restore(&mut self, text: &str) -> Result<(), LoadError> {
        let context = SerializationContext::from_json(&self.table, text)?;
        self.load(context)
    }

    /// Load state written by `serialize_binary`. On error the game is
    /// unchanged.
    pub fn restore_binary(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let context = SerializationContext::from_bytes(&self.table, bytes)?;
        self.load(context)
    }

    /// Like `restore`, reporting failure as `false`.
    pub fn deserialize(&mut self, text: &str) -> bool {
        match self.restore(text) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "rejected save data");
                false
            }
        }
    }

    /// Like `restore_binary`, reporting failure as `false`.
    pub fn deserialize_binary(&mut self, bytes: &[u8]) -> bool {
        match self.restore_binary(bytes) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "rejected binary save data");
                false
            }
        }
    }

    fn save_context(&self) -> SerializationContext {
        assert!(!self.is_busy(), "cannot save while a transaction is open");
        let data = SaveData::capture(&self.table, &self.history, self.games_started, self.games_won);
        let mut context = SerializationContext::for_table(&self.table);
        data.write(&mut context);
        context
    }

    fn load(&mut self, mut context: SerializationContext) -> Result<(), LoadError> {
        assert!(!self.is_busy(), "cannot load while a transaction is open");
        let data = SaveData::read(&mut context)?;
        data.check(&self.table)?;

        let games_started = data.games_started;
        let games_won = data.games_won;
        self.history = data.apply(&mut self.table);

        if self.games_started != games_started {
            self.games_started = games_started;
            self.notify(|l| l.games_started_changed(games_started));
        }
        if self.games_won != games_won {
            self.games_won = games_won;
            self.notify(|l| l.games_won_changed(games_won));
        }
        let won = self.rules.is_won(&self.table);
        self.set_won(won);
        self.sync_history_flags();

        debug!(
            undo = self.history.undo_len(),
            redo = self.history.redo_len(),
            "loaded save data"
        );
        Ok(())
    }

    // === Notifications ===

    fn set_won(&mut self, won: bool) {
        if self.won != won {
            self.won = won;
            self.notify(|l| l.won_changed(won));
        }
    }

    fn sync_history_flags(&mut self) {
        let can_undo = self.history.can_undo();
        if self.can_undo != can_undo {
            self.can_undo = can_undo;
            self.notify(|l| l.can_undo_changed(can_undo));
        }
        let can_redo = self.history.can_redo();
        if self.can_redo != can_redo {
            self.can_redo = can_redo;
            self.notify(|l| l.can_redo_changed(can_redo));
        }
    }

    fn notify(&mut self, f: impl FnOnce(&mut dyn GameListener)) {
        if let Some(listener) = self.listener.as_deref_mut() {
            f(listener);
        }
    }
}

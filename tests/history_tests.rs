//! Undo history integration tests.
//!
//! These tests verify the undo/redo laws over committed transactions.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{snapshot, Snapshot};
use proptest::prelude::*;
use solitaire_core::cards::{Colour, Rank, Suit};
use solitaire_core::core::{CardId, GameRng, PileId};
use solitaire_core::game::Game;
use solitaire_core::piles::Table;
use solitaire_core::rules::{Rules, Steps};

/// Applies whatever edits are queued in `script` when its first pile is
/// clicked.
#[derive(Debug, Default)]
struct Scripted {
    piles: Vec<PileId>,
    script: Rc<RefCell<Vec<Edit>>>,
}

#[derive(Clone, Copy, Debug)]
enum Edit {
    Move { card: u16, pile: usize, index: usize },
    Flip { card: u16 },
    Fan { pile: usize, fan: i64 },
}

impl Rules for Scripted {
    fn is_won(&self, _table: &Table) -> bool {
        false
    }

    fn restart(&mut self, _table: &Table, _rng: GameRng) -> Steps<Self> {
        Steps::new()
    }

    fn pile_primary(&mut self, _table: &Table, _pile: PileId) -> Steps<Self> {
        let edits: Vec<Edit> = self.script.borrow_mut().drain(..).collect();
        edits.into_iter().fold(Steps::new(), |steps, edit| {
            steps.then_do(move |rules: &mut Self, table| apply(table, &rules.piles, edit))
        })
    }
}

fn scripted_game() -> Game<Scripted> {
    Game::new(|table| {
        let piles: Vec<PileId> = (0..3).map(|_| table.add_pile()).collect();
        for (i, rank) in Rank::ALL[..9].iter().enumerate() {
            table.create_card(piles[i % 3], Suit::Diamonds, Colour::Red, *rank);
        }
        Scripted {
            piles,
            script: Rc::default(),
        }
    })
}

/// Commit `edits` as one action.
fn commit(game: &mut Game<Scripted>, edits: Vec<Edit>) {
    game.rules().script.borrow_mut().extend(edits);
    let first = game.rules().piles[0];
    let tx = game.pile_primary(first).expect("game is idle");
    game.complete(tx);
}

fn scripted_card(table: &Table, card: u16) -> CardId {
    table.card_id(usize::from(card)).expect("scripted card exists")
}

fn apply(table: &mut Table, piles: &[PileId], edit: Edit) {
    match edit {
        Edit::Move { card, pile, index } => {
            let pile = piles[pile];
            let index = index.min(table.pile(pile).len());
            let card = scripted_card(table, card);
            table.insert(pile, index, card);
        }
        Edit::Flip { card } => {
            let card = scripted_card(table, card);
            let up = table.card(card).face_up();
            table.flip(card, !up);
        }
        Edit::Fan { pile, fan } => table.set_max_fan(piles[pile], fan),
    }
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0u16..9, 0usize..3, 0usize..10).prop_map(|(card, pile, index)| Edit::Move { card, pile, index }),
        (0u16..9).prop_map(|card| Edit::Flip { card }),
        (0usize..3, -5i64..20).prop_map(|(pile, fan)| Edit::Fan { pile, fan }),
    ]
}

// =============================================================================
// Basic History Tests
// =============================================================================

#[test]
fn test_undo_redo_on_fresh_game_are_noops() {
    let mut game = scripted_game();
    let before = snapshot(game.table());
    assert!(!game.undo());
    assert!(!game.redo());
    assert_eq!(snapshot(game.table()), before);
}

#[test]
fn test_same_pile_moves_undo_exactly() {
    let mut game = scripted_game();
    let start = snapshot(game.table());

    // toward the top, then toward the bottom, of pile 0
    commit(&mut game, vec![Edit::Move { card: 0, pile: 0, index: 3 }]);
    commit(&mut game, vec![Edit::Move { card: 6, pile: 0, index: 0 }]);
    let end = snapshot(game.table());

    assert!(game.undo());
    assert!(game.undo());
    assert_eq!(snapshot(game.table()), start);
    assert!(game.redo());
    assert!(game.redo());
    assert_eq!(snapshot(game.table()), end);
}

#[test]
fn test_new_commit_clears_redo() {
    let mut game = scripted_game();
    commit(&mut game, vec![Edit::Flip { card: 1 }]);
    assert!(game.undo());
    assert!(game.can_redo());

    commit(&mut game, vec![Edit::Flip { card: 2 }]);
    assert!(!game.can_redo());
    assert_eq!(game.history().undo_len(), 1);
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Undoing every action then redoing every action restores each state
    /// exactly.
    #[test]
    fn prop_undo_then_redo_restores(
        actions in prop::collection::vec(prop::collection::vec(edit_strategy(), 0..5), 1..12)
    ) {
        let mut game = scripted_game();
        let mut states: Vec<Snapshot> = vec![snapshot(game.table())];
        for edits in actions {
            let before = game.history().undo_len();
            commit(&mut game, edits);
            if game.history().undo_len() > before {
                states.push(snapshot(game.table()));
            }
        }

        for expected in states.iter().rev().skip(1) {
            prop_assert!(game.undo());
            prop_assert_eq!(&snapshot(game.table()), expected);
            prop_assert!(game.table().is_consistent());
        }
        prop_assert!(!game.undo());

        for expected in states.iter().skip(1) {
            prop_assert!(game.redo());
            prop_assert_eq!(&snapshot(game.table()), expected);
        }
        prop_assert!(!game.redo());
    }
}

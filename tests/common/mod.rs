//! Shared helpers for integration tests.

#![allow(dead_code)]

use solitaire_core::cards::{Colour, Rank, Suit};
use solitaire_core::core::{CardId, GameRng, PileId};
use solitaire_core::game::Game;
use solitaire_core::games::simple::{SimpleOptions, SimpleSolitaire};
use solitaire_core::piles::Table;
use solitaire_core::rules::{Rules, Steps};

/// Observable table state: pile contents, face flags, max fans.
///
/// Cards are recorded by arena position so snapshots of two games built
/// the same way compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub piles: Vec<Vec<usize>>,
    pub face_up: Vec<bool>,
    pub max_fan: Vec<u32>,
}

pub fn snapshot(table: &Table) -> Snapshot {
    Snapshot {
        piles: table
            .piles()
            .iter()
            .map(|p| p.iter().map(CardId::index).collect())
            .collect(),
        face_up: table.cards().iter().map(|c| c.face_up()).collect(),
        max_fan: table.piles().iter().map(|p| p.max_fan()).collect(),
    }
}

pub fn simple_game(options: SimpleOptions) -> Game<SimpleSolitaire> {
    Game::new(|table| SimpleSolitaire::new(table, options))
}

/// A simple game dealt from `seed`, auto moves off.
pub fn dealt_game(seed: u64) -> Game<SimpleSolitaire> {
    let mut game = simple_game(SimpleOptions::default().auto_move(false));
    let deal = game.restart(seed).expect("fresh game is idle");
    game.complete(deal);
    game
}

/// Play one greedy move: send the waste top to a foundation when it fits,
/// otherwise draw (or restock).
pub fn greedy_move(game: &mut Game<SimpleSolitaire>) {
    let waste = game.rules().waste();
    if let Some(top) = game.table().pile(waste).peek() {
        let foundations = *game.rules().foundations();
        if let Some(&target) = foundations.iter().find(|&&f| game.preview_drop(top, f)) {
            let tx = game.drop_card(top, target).expect("game is idle");
            game.complete(tx);
            return;
        }
    }
    let stock = game.rules().stock();
    let tx = game.pile_primary(stock).expect("game is idle");
    game.complete(tx);
}

/// Play greedily until won. Single draws with unlimited restocks always win.
pub fn play_to_win(game: &mut Game<SimpleSolitaire>) {
    for _ in 0..20_000 {
        if game.won() {
            return;
        }
        greedy_move(game);
    }
    panic!("greedy play did not win");
}

// =============================================================================
// Two-pile mini game
// =============================================================================

/// Two piles, two cards. Pile-primary on `left` flips its top card face up
/// then face down within one action; card-primary moves the card to the
/// other pile. Won when both cards sit on `right`.
#[derive(Debug)]
pub struct MiniRules {
    pub left: PileId,
    pub right: PileId,
    pub cards: [CardId; 2],
}

impl Rules for MiniRules {
    fn is_won(&self, table: &Table) -> bool {
        table.pile(self.right).len() == 2
    }

    fn restart(&mut self, _table: &Table, _rng: GameRng) -> Steps<Self> {
        Steps::new().then_do(|rules: &mut Self, table| {
            for card in rules.cards {
                table.push(rules.left, card);
                table.flip(card, false);
            }
        })
    }

    fn pile_primary(&mut self, table: &Table, pile: PileId) -> Steps<Self> {
        let Some(card) = table.pile(pile).peek() else {
            return Steps::new();
        };
        Steps::new().then_do(move |_, table: &mut Table| {
            table.flip(card, true);
            table.flip(card, false);
        })
    }

    fn card_primary(&mut self, table: &Table, card: CardId) -> Steps<Self> {
        let target = if table.card(card).pile() == self.left {
            self.right
        } else {
            self.left
        };
        Steps::new().then_do(move |_, table: &mut Table| table.push(target, card))
    }

    fn card_secondary(&mut self, _table: &Table, card: CardId) -> Steps<Self> {
        Steps::new().then_do(move |_, table: &mut Table| table.flip(card, true))
    }
}

pub fn mini_game() -> Game<MiniRules> {
    Game::new(|table| {
        let left = table.add_pile();
        let right = table.add_pile();
        let cards = [
            table.create_card(left, Suit::Hearts, Colour::Red, Rank::Ace),
            table.create_card(left, Suit::Spades, Colour::Black, Rank::King),
        ];
        MiniRules { left, right, cards }
    })
}

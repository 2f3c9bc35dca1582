//! Table integration tests.
//!
//! These tests verify pile membership, the card back-reference invariant
//! and undoable bulk reorderings through the public API.

mod common;

use proptest::prelude::*;
use solitaire_core::cards::{standard_52_deck, Colour, Rank, Suit};
use solitaire_core::core::{CardId, GameRng, PileId};
use solitaire_core::piles::Table;

fn table_with(piles: &[usize]) -> (Table, Vec<PileId>) {
    let mut table = Table::new();
    let ids: Vec<PileId> = piles.iter().map(|_| table.add_pile()).collect();
    let mut rank = Rank::ALL.iter().cycle();
    for (&pile, &count) in ids.iter().zip(piles) {
        for _ in 0..count {
            let rank = *rank.next().unwrap();
            table.create_card(pile, Suit::Clubs, Colour::Black, rank);
        }
    }
    (table, ids)
}

fn assert_invariant(table: &Table) {
    for id in table.card_ids() {
        let card = table.card(id);
        assert_eq!(table.pile(card.pile()).at(card.pile_index()), id);
    }
    assert!(table.is_consistent());
}

// =============================================================================
// Insert Tests
// =============================================================================

/// Moving a card out of the middle of one pile onto the bottom of another.
#[test]
fn test_insert_middle_card_to_front_of_other_pile() {
    let (mut table, piles) = table_with(&[5, 4]);
    let (p, q) = (piles[0], piles[1]);
    let a = table.pile(p).at(2);
    let after_a: Vec<CardId> = table.pile(p).cards_from(3);
    let q_before: Vec<CardId> = table.pile(q).iter().collect();

    table.insert(q, 0, a);

    assert_eq!(table.card(a).pile(), q);
    assert_eq!(table.card(a).pile_index(), 0);
    for (offset, &card) in after_a.iter().enumerate() {
        assert_eq!(table.card(card).pile_index(), 2 + offset);
    }
    let q_after: Vec<CardId> = table.pile(q).iter().collect();
    assert_eq!(q_after[0], a);
    assert_eq!(&q_after[1..], q_before.as_slice());
    assert_invariant(&table);
}

/// Every legal insert position for every card keeps the invariant.
#[test]
fn test_every_insert_position_keeps_invariant() {
    let (base, piles) = table_with(&[3, 2, 0]);
    for card in base.card_ids() {
        for &pile in &piles {
            for index in 0..=base.pile(pile).len() {
                let (mut table, _) = table_with(&[3, 2, 0]);
                table.insert(pile, index, card);
                assert_invariant(&table);
            }
        }
    }
}

// =============================================================================
// Bulk Reordering Tests
// =============================================================================

#[test]
fn test_deck_sort_orders() {
    let mut table = Table::new();
    let stock = table.add_pile();
    standard_52_deck(&mut table, stock);

    table.shuffle_pile(stock, &mut GameRng::new(3));
    table.sort_pile(stock);
    let first = table.card(table.pile(stock).at(0));
    assert_eq!((first.suit(), first.rank()), (Suit::Spades, Rank::Ace));

    table.sort_pile_by_rank(stock);
    let first = table.card(table.pile(stock).at(0));
    let last = table.card(table.pile(stock).peek().unwrap());
    assert_eq!(first.rank(), Rank::King);
    assert_eq!(last.rank(), Rank::Ace);
    assert_invariant(&table);
}

#[test]
fn test_shuffle_is_seeded() {
    let order = |seed| {
        let mut table = Table::new();
        let stock = table.add_pile();
        standard_52_deck(&mut table, stock);
        table.shuffle_pile(stock, &mut GameRng::new(seed));
        table.pile(stock).iter().map(CardId::index).collect::<Vec<_>>()
    };
    assert_eq!(order(11), order(11));
    assert_ne!(order(11), order(12));
}

/// Deck construction order is what save data ids depend on.
#[test]
fn test_deck_construction_order_is_stable() {
    let mut table = Table::new();
    let stock = table.add_pile();
    let deck = standard_52_deck(&mut table, stock);

    let faces: Vec<(Suit, Rank)> = deck
        .iter()
        .map(|&c| (table.card(c).suit(), table.card(c).rank()))
        .collect();
    assert_eq!(faces[0], (Suit::Spades, Rank::Ace));
    assert_eq!(faces[12], (Suit::Spades, Rank::King));
    assert_eq!(faces[13], (Suit::Hearts, Rank::Ace));
    assert_eq!(faces[26], (Suit::Diamonds, Rank::Ace));
    assert_eq!(faces[51], (Suit::Clubs, Rank::King));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Arbitrary insert sequences never break the back-reference invariant.
    #[test]
    fn prop_random_inserts_keep_invariant(
        moves in prop::collection::vec((0usize..12, 0usize..3, 0usize..13), 1..60)
    ) {
        let (mut table, piles) = table_with(&[4, 4, 4]);
        for (card, pile, index) in moves {
            let pile = piles[pile];
            let index = index.min(table.pile(pile).len());
            let card = table.card_id(card).unwrap();
            table.insert(pile, index, card);
            prop_assert!(table.is_consistent());
        }
        let total: usize = table.piles().iter().map(|p| p.len()).sum();
        prop_assert_eq!(total, 12);
    }
}

//! The card and pile arena.
//!
//! `Table` owns every card and pile of one game. It is the only place where
//! card placement, orientation and pile fan are written, and it writes them
//! in two layers:
//!
//! - **Public mutators** (`insert`, `push`, `flip`, `set_max_fan`, and the
//!   bulk reorderings built on `insert`) describe the change as an undoable
//!   `Operation`, record it into the open transaction if there is one, then
//!   apply it.
//! - **Raw primitives** (`place`, `set_face_up_raw`, `set_max_fan_raw`) apply
//!   a change, keep every card's `pile_index` in sync with its pile, and
//!   notify the observer. Only operations call these.
//!
//! ## Invariant
//!
//! For every card `c`: `pile(c.pile()).at(c.pile_index()) == c`. This holds
//! after every primitive, including multi-card reorderings.
//!
//! ```
//! use solitaire_core::cards::{Colour, Rank, Suit};
//! use solitaire_core::piles::Table;
//!
//! let mut table = Table::new();
//! let left = table.add_pile();
//! let right = table.add_pile();
//! let ace = table.create_card(left, Suit::Spades, Colour::Black, Rank::Ace);
//!
//! table.push(right, ace);
//! assert_eq!(table.card(ace).pile(), right);
//! assert!(table.pile(left).is_empty());
//! ```

use crate::cards::{Card, Colour, Rank, Suit};
use crate::core::{CardId, GameRng, PileId, TableId};
use crate::serialization::PileLayout;
use crate::undo::{CardFlip, CompoundOperation, Operation, PileInsert, PileMaxFan};

use super::pile::{Pile, MAX_FAN};

/// Receives change notifications from a `Table`.
///
/// Notifications let a presenter resynchronize its view. They are not part
/// of the undo or serialization contract. All methods default to no-ops.
pub trait TableObserver {
    /// A pile gained, lost or reordered cards.
    fn pile_cards_changed(&mut self, _pile: PileId) {}

    /// A pile's `max_fan` changed.
    fn pile_max_fan_changed(&mut self, _pile: PileId) {}

    /// A card moved to a different pile.
    fn card_pile_changed(&mut self, _card: CardId) {}

    /// A card's offset changed within the same pile.
    fn card_pile_index_changed(&mut self, _card: CardId) {}

    /// A card was turned over.
    fn card_face_up_changed(&mut self, _card: CardId) {}
}

/// Arena of cards and piles for one game.
pub struct Table {
    id: TableId,
    cards: Vec<Card>,
    piles: Vec<Pile>,
    /// Operations recorded since the transaction opened.
    transaction: Option<CompoundOperation>,
    observer: Option<Box<dyn TableObserver>>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("cards", &self.cards)
            .field("piles", &self.piles)
            .field("transaction", &self.transaction)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Create an empty table with a fresh `TableId`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TableId::next(),
            cards: Vec::new(),
            piles: Vec::new(),
            transaction: None,
            observer: None,
        }
    }

    /// The stamp carried by every handle this table issues.
    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    // === Construction ===

    /// Add an empty pile. Pile handles are assigned in call order.
    pub fn add_pile(&mut self) -> PileId {
        let id = PileId::issued(
            self.id,
            u16::try_from(self.piles.len()).unwrap_or_else(|_| panic!("too many piles")),
        );
        self.piles.push(Pile::new(id));
        id
    }

    /// Create a face-down card on top of `pile`.
    ///
    /// Construction is not an undoable mutation: cards exist for the whole
    /// life of the game.
    pub fn create_card(&mut self, pile: PileId, suit: Suit, colour: Colour, rank: Rank) -> CardId {
        self.assert_pile(pile);
        let id = CardId::issued(
            self.id,
            u16::try_from(self.cards.len()).unwrap_or_else(|_| panic!("too many cards")),
        );
        let index = self.piles[pile.index()].len();
        self.cards.push(Card::new(suit, colour, rank, pile, index));
        self.piles[pile.index()].cards.push_back(id);
        self.notify(|o| o.pile_cards_changed(pile));
        id
    }

    /// Install the change observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn TableObserver>) {
        self.observer = Some(observer);
    }

    /// Remove the change observer.
    pub fn clear_observer(&mut self) -> Option<Box<dyn TableObserver>> {
        self.observer.take()
    }

    // === Queries ===

    /// All cards in arena order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// All piles in arena order.
    #[must_use]
    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    /// Card by handle. Panics on a handle from another table.
    #[must_use]
    pub fn card(&self, card: CardId) -> &Card {
        self.assert_card(card);
        &self.cards[card.index()]
    }

    /// Pile by handle. Panics on a handle from another table.
    #[must_use]
    pub fn pile(&self, pile: PileId) -> &Pile {
        self.assert_pile(pile);
        &self.piles[pile.index()]
    }

    /// Card handles in arena order.
    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.cards.len()).map(|i| CardId::issued(self.id, i as u16))
    }

    /// Pile handles in arena order.
    pub fn pile_ids(&self) -> impl Iterator<Item = PileId> + '_ {
        (0..self.piles.len()).map(|i| PileId::issued(self.id, i as u16))
    }

    /// Handle of the card at arena position `index`.
    #[must_use]
    pub fn card_id(&self, index: usize) -> Option<CardId> {
        (index < self.cards.len()).then(|| CardId::issued(self.id, index as u16))
    }

    /// Handle of the pile at arena position `index`.
    #[must_use]
    pub fn pile_id(&self, index: usize) -> Option<PileId> {
        (index < self.piles.len()).then(|| PileId::issued(self.id, index as u16))
    }

    /// Whether `card` is a handle of this table.
    #[must_use]
    pub fn owns_card(&self, card: CardId) -> bool {
        card.table() == self.id && card.index() < self.cards.len()
    }

    /// Whether `pile` is a handle of this table.
    #[must_use]
    pub fn owns_pile(&self, pile: PileId) -> bool {
        pile.table() == self.id && pile.index() < self.piles.len()
    }

    /// Panics unless `card` belongs to this table.
    pub fn assert_card(&self, card: CardId) {
        assert!(
            self.owns_card(card),
            "{card} of {} does not belong to {} ({} cards)",
            card.table(),
            self.id,
            self.cards.len()
        );
    }

    /// Panics unless `pile` belongs to this table.
    pub fn assert_pile(&self, pile: PileId) {
        assert!(
            self.owns_pile(pile),
            "{pile} of {} does not belong to {} ({} piles)",
            pile.table(),
            self.id,
            self.piles.len()
        );
    }

    /// Check that every card's back-reference matches its pile's contents
    /// and that every card sits in exactly one pile.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let placed: usize = self.piles.iter().map(Pile::len).sum();
        placed == self.cards.len()
            && self.cards.iter().enumerate().all(|(i, card)| {
                self.piles
                    .get(card.pile.index())
                    .and_then(|pile| pile.get(card.pile_index))
                    == Some(CardId::issued(self.id, i as u16))
            })
    }

    // === Transactions ===

    /// Whether a transaction is currently recording operations.
    #[must_use]
    pub fn is_transaction_open(&self) -> bool {
        self.transaction.is_some()
    }

    /// Start recording. Returns `false` if a transaction is already open.
    pub(crate) fn open_transaction(&mut self) -> bool {
        if self.transaction.is_some() {
            return false;
        }
        self.transaction = Some(CompoundOperation::new());
        true
    }

    /// Stop recording and hand back everything recorded.
    ///
    /// Panics if no transaction is open.
    pub(crate) fn close_transaction(&mut self) -> CompoundOperation {
        match self.transaction.take() {
            Some(op) => op,
            None => panic!("close_transaction called with no open transaction"),
        }
    }

    fn record(&mut self, op: Operation) {
        if let Some(transaction) = self.transaction.as_mut() {
            transaction.push(op);
        }
    }

    // === Undoable mutators ===

    /// Move `card` into `pile` at `index`.
    ///
    /// `index` may range over `0..=pile.len()`. When the card already lives
    /// in `pile` below `index`, the index is reduced by one: the card slides
    /// to just under the card that was at `index`. Moving a card onto its
    /// own position changes nothing and records nothing.
    pub fn insert(&mut self, pile: PileId, index: usize, card: CardId) {
        self.assert_pile(pile);
        self.assert_card(card);

        let current = self.cards[card.index()];
        let len = self.piles[pile.index()].len();
        assert!(index <= len, "insert index {index} out of range for {pile} (len {len})");

        let mut index = index;
        if current.pile == pile && index > current.pile_index {
            index -= 1;
        }
        if current.pile == pile && index == current.pile_index {
            return;
        }

        let op = PileInsert {
            card,
            old_pile: current.pile,
            old_index: current.pile_index,
            new_pile: pile,
            new_index: index,
        };
        op.redo(self);
        self.record(Operation::Insert(op));
    }

    /// Move `card` onto the top of `pile`.
    pub fn push(&mut self, pile: PileId, card: CardId) {
        let len = self.pile(pile).len();
        self.insert(pile, len, card);
    }

    /// Turn `card` face up or face down. No-op if already so.
    pub fn flip(&mut self, card: CardId, face_up: bool) {
        let old = self.card(card).face_up;
        if old == face_up {
            return;
        }

        let op = CardFlip {
            card,
            old_face_up: old,
            new_face_up: face_up,
        };
        op.redo(self);
        self.record(Operation::Flip(op));
    }

    /// Set how many top cards of `pile` fan out, clamped to `0..=MAX_FAN`.
    pub fn set_max_fan(&mut self, pile: PileId, max_fan: i64) {
        let old = self.pile(pile).max_fan;
        let new = max_fan.clamp(0, i64::from(MAX_FAN)) as u32;
        if old == new {
            return;
        }

        let op = PileMaxFan {
            pile,
            old_max_fan: old,
            new_max_fan: new,
        };
        op.redo(self);
        self.record(Operation::MaxFan(op));
    }

    /// Rearrange `pile` so its cards run bottom to top in `order`.
    ///
    /// `order` must be a permutation of the pile's current cards. Built from
    /// `insert`, so the rearrangement is undoable.
    pub fn reorder(&mut self, pile: PileId, order: &[CardId]) {
        let current = self.pile(pile);
        assert_eq!(
            order.len(),
            current.len(),
            "reorder of {pile} must list every card exactly once"
        );
        for &card in order {
            assert_eq!(self.card(card).pile, pile, "{card} is not in {pile}");
        }

        for (index, &card) in order.iter().enumerate() {
            self.insert(pile, index, card);
        }
    }

    /// Sort `pile` by suit, then colour, then rank.
    pub fn sort_pile(&mut self, pile: PileId) {
        let mut order: Vec<CardId> = self.pile(pile).iter().collect();
        order.sort_by_key(|&c| {
            let card = &self.cards[c.index()];
            (card.suit(), card.colour(), card.rank())
        });
        self.reorder(pile, &order);
    }

    /// Sort `pile` by descending rank, then colour, then suit.
    pub fn sort_pile_by_rank(&mut self, pile: PileId) {
        let mut order: Vec<CardId> = self.pile(pile).iter().collect();
        order.sort_by_key(|&c| {
            let card = &self.cards[c.index()];
            (std::cmp::Reverse(card.rank()), card.colour(), card.suit())
        });
        self.reorder(pile, &order);
    }

    /// Shuffle `pile` with `rng`.
    pub fn shuffle_pile(&mut self, pile: PileId, rng: &mut GameRng) {
        let mut order: Vec<CardId> = self.pile(pile).iter().collect();
        rng.shuffle(&mut order);
        self.reorder(pile, &order);
    }

    // === Raw primitives ===

    /// Take `card` out of its pile and put it at `index` of `pile`, where
    /// `index` counts positions after the removal.
    pub(crate) fn place(&mut self, card: CardId, pile: PileId, index: usize) {
        let from = self.cards[card.index()].pile;
        let from_index = self.cards[card.index()].pile_index;

        let removed = self.piles[from.index()].cards.remove(from_index);
        debug_assert_eq!(removed, card);
        if from != pile {
            self.renumber(from, from_index);
            self.notify(|o| o.pile_cards_changed(from));
        }

        let target = &mut self.piles[pile.index()].cards;
        assert!(
            index <= target.len(),
            "place index {index} out of range for {pile} (len {})",
            target.len()
        );
        target.insert(index, card);

        let entry = &mut self.cards[card.index()];
        let moved_pile = entry.pile != pile;
        let moved_index = entry.pile_index != index;
        entry.pile = pile;
        entry.pile_index = index;
        if moved_pile {
            self.notify(|o| o.card_pile_changed(card));
        } else if moved_index {
            self.notify(|o| o.card_pile_index_changed(card));
        }

        let start = if from == pile { from_index.min(index) } else { index + 1 };
        self.renumber(pile, start);
        self.notify(|o| o.pile_cards_changed(pile));

        debug_assert!(self.cards[card.index()].pile_index == index);
    }

    pub(crate) fn set_face_up_raw(&mut self, card: CardId, face_up: bool) {
        self.cards[card.index()].face_up = face_up;
        self.notify(|o| o.card_face_up_changed(card));
    }

    pub(crate) fn set_max_fan_raw(&mut self, pile: PileId, max_fan: u32) {
        self.piles[pile.index()].max_fan = max_fan;
        self.notify(|o| o.pile_max_fan_changed(pile));
    }

    /// Overwrite every pile's contents and fan and every card's face.
    ///
    /// `piles` must place each card exactly once; `SaveData::validate_layout`
    /// checks that before anything calls this.
    pub(crate) fn apply_layout(&mut self, face_up: &[bool], piles: &[PileLayout]) {
        for (index, layout) in piles.iter().enumerate() {
            let id = PileId::issued(self.id, index as u16);
            let pile = &mut self.piles[index];
            pile.cards = layout.cards.iter().copied().collect();
            pile.max_fan = layout.max_fan;
            for (offset, &card) in layout.cards.iter().enumerate() {
                let entry = &mut self.cards[card.index()];
                entry.pile = id;
                entry.pile_index = offset;
            }
            self.notify(|o| o.pile_cards_changed(id));
            self.notify(|o| o.pile_max_fan_changed(id));
        }
        for (index, &up) in face_up.iter().enumerate() {
            self.cards[index].face_up = up;
            let card = CardId::issued(self.id, index as u16);
            self.notify(|o| o.card_pile_changed(card));
            self.notify(|o| o.card_face_up_changed(card));
        }
        debug_assert!(self.is_consistent());
    }

    /// A copy of the cards and piles with no observer and no transaction.
    /// It keeps this table's id, so this table's handles work on it.
    pub(crate) fn detached(&self) -> Table {
        Table {
            id: self.id,
            cards: self.cards.clone(),
            piles: self.piles.clone(),
            transaction: None,
            observer: None,
        }
    }

    /// Refresh `pile_index` for every card of `pile` from `start` upwards.
    fn renumber(&mut self, pile: PileId, start: usize) {
        let len = self.piles[pile.index()].len();
        for i in start..len {
            let card = self.piles[pile.index()].cards[i];
            if self.cards[card.index()].pile_index != i {
                self.cards[card.index()].pile_index = i;
                self.notify(|o| o.card_pile_index_changed(card));
            }
        }
    }

    fn notify(&mut self, f: impl FnOnce(&mut dyn TableObserver)) {
        if let Some(observer) = self.observer.as_deref_mut() {
            f(observer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Table with two piles: `p` holds cards 0..5, `q` holds cards 5..8.
    fn two_piles() -> (Table, PileId, PileId) {
        let mut table = Table::new();
        let p = table.add_pile();
        let q = table.add_pile();
        for rank in &Rank::ALL[..5] {
            table.create_card(p, Suit::Hearts, Colour::Red, *rank);
        }
        for rank in &Rank::ALL[..3] {
            table.create_card(q, Suit::Spades, Colour::Black, *rank);
        }
        (table, p, q)
    }

    /// This table's handle for card position `n`.
    fn card(table: &Table, n: u16) -> CardId {
        CardId::issued(table.id(), n)
    }

    fn contents(table: &Table, pile: PileId) -> Vec<u16> {
        table.pile(pile).iter().map(CardId::raw).collect()
    }

    #[test]
    fn test_create_assigns_indices() {
        let (table, p, q) = two_piles();
        assert_eq!(contents(&table, p), vec![0, 1, 2, 3, 4]);
        assert_eq!(contents(&table, q), vec![5, 6, 7]);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_insert_into_other_pile_renumbers_both() {
        let (mut table, p, q) = two_piles();
        let a = card(&table, 2);

        table.insert(q, 0, a);

        assert_eq!(table.card(a).pile(), q);
        assert_eq!(table.card(a).pile_index(), 0);
        assert_eq!(contents(&table, p), vec![0, 1, 3, 4]);
        assert_eq!(table.card(card(&table, 3)).pile_index(), 2);
        assert_eq!(table.card(card(&table, 4)).pile_index(), 3);
        assert_eq!(contents(&table, q), vec![2, 5, 6, 7]);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_insert_same_pile_slides_up() {
        let (mut table, p, _) = two_piles();

        // index 4 is after the card's own position 1: slide semantics
        table.insert(p, 4, card(&table, 1));

        assert_eq!(contents(&table, p), vec![0, 2, 3, 1, 4]);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_insert_same_pile_slides_down() {
        let (mut table, p, _) = two_piles();

        table.insert(p, 0, card(&table, 3));

        assert_eq!(contents(&table, p), vec![3, 0, 1, 2, 4]);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_push_same_pile_moves_to_top() {
        let (mut table, p, _) = two_piles();
        table.push(p, card(&table, 0));
        assert_eq!(contents(&table, p), vec![1, 2, 3, 4, 0]);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_insert_onto_own_position_records_nothing() {
        let (mut table, p, _) = two_piles();
        assert!(table.open_transaction());

        table.insert(p, 2, card(&table, 2));
        table.insert(p, 3, card(&table, 2));

        assert!(table.close_transaction().is_empty());
        assert_eq!(contents(&table, p), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_insert_past_end_panics() {
        let (mut table, _, q) = two_piles();
        table.insert(q, 4, card(&table, 0));
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn test_out_of_range_card_panics() {
        let (mut table, p, _) = two_piles();
        table.push(p, CardId::issued(table.id(), 99));
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn test_card_of_another_table_panics() {
        let (mut table, p, _) = two_piles();
        let (other, _, _) = two_piles();
        // same position, different table
        let foreign = other.card_id(0).unwrap();
        assert!(!table.owns_card(foreign));
        table.push(p, foreign);
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn test_unstamped_pile_panics() {
        let (table, _, _) = two_piles();
        let _ = table.pile(PileId::new(0));
    }

    #[test]
    fn test_handles_carry_the_table_id() {
        let (table, p, _) = two_piles();
        let (other, _, _) = two_piles();
        assert_ne!(table.id(), other.id());
        assert_eq!(p.table(), table.id());
        assert!(table.owns_pile(p));
        assert!(!other.owns_pile(p));
        assert_eq!(table.card_id(7), Some(card(&table, 7)));
        assert_eq!(table.card_id(8), None);
        assert_eq!(table.pile_id(1), table.pile_ids().nth(1));
        assert!(table.card_ids().all(|c| table.owns_card(c)));
    }

    #[test]
    fn test_flip_records_only_changes() {
        let (mut table, _, _) = two_piles();
        let ace = card(&table, 0);
        assert!(table.open_transaction());

        table.flip(ace, false);
        table.flip(ace, true);
        table.flip(ace, true);

        let recorded = table.close_transaction();
        assert_eq!(recorded.len(), 1);
        assert!(table.card(ace).face_up());
    }

    #[test]
    fn test_set_max_fan_clamps() {
        let (mut table, p, _) = two_piles();

        table.set_max_fan(p, -3);
        assert_eq!(table.pile(p).max_fan(), 0);

        table.set_max_fan(p, 5000);
        assert_eq!(table.pile(p).max_fan(), MAX_FAN);

        table.set_max_fan(p, 3);
        assert_eq!(table.pile(p).max_fan(), 3);
    }

    #[test]
    fn test_mutations_outside_transaction_are_not_recorded() {
        let (mut table, p, q) = two_piles();
        table.push(q, card(&table, 0));
        table.flip(card(&table, 0), true);
        assert!(table.open_transaction());
        assert!(table.close_transaction().is_empty());
        assert_eq!(table.pile(p).len(), 4);
    }

    #[test]
    fn test_open_transaction_is_exclusive() {
        let (mut table, _, _) = two_piles();
        assert!(table.open_transaction());
        assert!(!table.open_transaction());
        assert!(table.is_transaction_open());
        let _ = table.close_transaction();
        assert!(!table.is_transaction_open());
    }

    #[test]
    #[should_panic(expected = "no open transaction")]
    fn test_close_without_open_panics() {
        let (mut table, _, _) = two_piles();
        let _ = table.close_transaction();
    }

    #[test]
    fn test_sort_and_shuffle_keep_invariant() {
        let (mut table, p, q) = two_piles();
        for n in contents(&table, q) {
            table.push(p, card(&table, n));
        }

        let mut rng = GameRng::new(7);
        table.shuffle_pile(p, &mut rng);
        assert!(table.is_consistent());

        table.sort_pile(p);
        assert!(table.is_consistent());
        let suits: Vec<_> = table.pile(p).iter().map(|c| table.card(c).suit()).collect();
        assert_eq!(&suits[..3], &[Suit::Spades; 3]);

        table.sort_pile_by_rank(p);
        assert!(table.is_consistent());
        let top = table.pile(p).bottom().unwrap();
        assert_eq!(table.card(top).rank(), Rank::Five);
    }

    #[test]
    fn test_reorder_is_undoable() {
        let (mut table, p, _) = two_piles();
        let before = contents(&table, p);
        assert!(table.open_transaction());

        let order: Vec<CardId> = [4u16, 2, 0, 3, 1].iter().map(|&c| card(&table, c)).collect();
        table.reorder(p, &order);
        assert_eq!(contents(&table, p), vec![4, 2, 0, 3, 1]);

        let recorded = table.close_transaction();
        recorded.undo(&mut table);
        assert_eq!(contents(&table, p), before);
        assert!(table.is_consistent());
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Cards(PileId),
        Fan(PileId),
        MovedPile(CardId),
        MovedIndex(CardId),
        Face(CardId),
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl TableObserver for Recorder {
        fn pile_cards_changed(&mut self, pile: PileId) {
            self.0.borrow_mut().push(Event::Cards(pile));
        }
        fn pile_max_fan_changed(&mut self, pile: PileId) {
            self.0.borrow_mut().push(Event::Fan(pile));
        }
        fn card_pile_changed(&mut self, card: CardId) {
            self.0.borrow_mut().push(Event::MovedPile(card));
        }
        fn card_pile_index_changed(&mut self, card: CardId) {
            self.0.borrow_mut().push(Event::MovedIndex(card));
        }
        fn card_face_up_changed(&mut self, card: CardId) {
            self.0.borrow_mut().push(Event::Face(card));
        }
    }

    #[test]
    fn test_observer_notifications() {
        let (mut table, p, q) = two_piles();
        let events = Rc::new(RefCell::new(Vec::new()));
        table.set_observer(Box::new(Recorder(events.clone())));

        table.insert(q, 0, card(&table, 3));
        table.flip(card(&table, 3), true);
        table.set_max_fan(q, 1);

        let events = events.borrow();
        assert!(events.contains(&Event::Cards(p)));
        assert!(events.contains(&Event::Cards(q)));
        assert!(events.contains(&Event::MovedPile(card(&table, 3))));
        assert!(events.contains(&Event::MovedIndex(card(&table, 4))));
        assert!(events.contains(&Event::MovedIndex(card(&table, 5))));
        assert!(events.contains(&Event::Face(card(&table, 3))));
        assert!(events.contains(&Event::Fan(q)));
    }

    #[test]
    fn test_apply_layout_rewrites_back_references() {
        let (mut table, p, q) = two_piles();
        let mut face_up = vec![false; 8];
        face_up[7] = true;
        let layout = [
            PileLayout {
                max_fan: 1,
                cards: vec![card(&table, 7)],
            },
            PileLayout {
                max_fan: MAX_FAN,
                cards: (0..7).map(|n| card(&table, n)).collect(),
            },
        ];

        table.apply_layout(&face_up, &layout);

        assert!(table.is_consistent());
        assert_eq!(contents(&table, p), vec![7]);
        assert_eq!(table.pile(p).max_fan(), 1);
        assert_eq!(table.card(card(&table, 6)).pile(), q);
        assert_eq!(table.card(card(&table, 6)).pile_index(), 6);
        assert!(table.card(card(&table, 7)).face_up());
    }

    #[test]
    fn test_detached_copy_does_not_notify() {
        let (mut table, _, q) = two_piles();
        let events = Rc::new(RefCell::new(Vec::new()));
        table.set_observer(Box::new(Recorder(events.clone())));

        let mut scratch = table.detached();
        scratch.push(q, card(&table, 0));

        assert!(events.borrow().is_empty());
        assert_eq!(table.pile(q).len(), 3);
        assert_eq!(scratch.pile(q).len(), 4);
    }
}

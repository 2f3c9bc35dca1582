//! Simple game implementation.

use serde::{Deserialize, Serialize};

use crate::cards::standard_52_deck;
use crate::core::{CardId, DelayHint, GameRng, PileId};
use crate::piles::Table;
use crate::rules::{DragInfo, Rules, Steps};

/// Options for `SimpleSolitaire`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleOptions {
    /// Cards turned from the stock per draw, 1 to 5.
    pub draw_count: u8,
    /// How often the waste may be turned back into the stock. `None` is
    /// unlimited.
    pub restocks_allowed: Option<u32>,
    /// Move fitting waste cards to the foundations automatically.
    pub auto_move: bool,
}

impl Default for SimpleOptions {
    fn default() -> Self {
        Self {
            draw_count: 1,
            restocks_allowed: None,
            auto_move: true,
        }
    }
}

impl SimpleOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draw_count(mut self, count: u8) -> Self {
        self.draw_count = count.clamp(1, 5);
        self
    }

    #[must_use]
    pub fn restocks_allowed(mut self, restocks: Option<u32>) -> Self {
        self.restocks_allowed = restocks;
        self
    }

    #[must_use]
    pub fn auto_move(mut self, enabled: bool) -> Self {
        self.auto_move = enabled;
        self
    }
}

/// Stock, waste and four foundations.
///
/// Cards are drawn from the stock onto the waste and built up by suit from
/// ace to king on the foundations. The game is won when every foundation
/// holds thirteen cards.
#[derive(Clone, Debug)]
pub struct SimpleSolitaire {
    options: SimpleOptions,
    stock: PileId,
    waste: PileId,
    foundations: [PileId; 4],
    /// Restocks since the last deal. Rule-local: not rewound by undo.
    restocks: u32,
}

impl SimpleSolitaire {
    /// Lay out the piles and the deck on an empty table.
    ///
    /// Piles are created stock, waste, then foundations; the deck is built
    /// into the stock.
    pub fn new(table: &mut Table, options: SimpleOptions) -> Self {
        let stock = table.add_pile();
        let waste = table.add_pile();
        let foundations = [
            table.add_pile(),
            table.add_pile(),
            table.add_pile(),
            table.add_pile(),
        ];
        standard_52_deck(table, stock);

        Self {
            options: SimpleOptions {
                draw_count: options.draw_count.clamp(1, 5),
                ..options
            },
            stock,
            waste,
            foundations,
            restocks: 0,
        }
    }

    pub fn options(&self) -> &SimpleOptions {
        &self.options
    }

    pub fn stock(&self) -> PileId {
        self.stock
    }

    pub fn waste(&self) -> PileId {
        self.waste
    }

    pub fn foundations(&self) -> &[PileId; 4] {
        &self.foundations
    }

    pub fn restocks(&self) -> u32 {
        self.restocks
    }

    fn is_foundation(&self, pile: PileId) -> bool {
        self.foundations.contains(&pile)
    }

    fn can_restock(&self, table: &Table) -> bool {
        table.pile(self.stock).is_empty()
            && !table.pile(self.waste).is_empty()
            && self.options.restocks_allowed.map_or(true, |max| self.restocks < max)
    }

    /// Whether `card` is a face-up top card that may leave its pile.
    fn is_drop_source(&self, table: &Table, card: CardId) -> bool {
        let entry = table.card(card);
        let pile = entry.pile();
        entry.face_up()
            && (pile == self.waste || self.is_foundation(pile))
            && table.pile(pile).peek() == Some(card)
    }

    /// Whether `card` can go on `foundation` next.
    fn fits_foundation(&self, table: &Table, card: CardId, foundation: PileId) -> bool {
        if table.card(card).pile() == foundation || !self.is_foundation(foundation) {
            return false;
        }
        let face = table.card(card);
        match table.pile(foundation).peek() {
            None => face.rank().value() == 1,
            Some(top) => {
                let top = table.card(top);
                top.suit() == face.suit() && top.rank().next() == Some(face.rank())
            }
        }
    }

    fn foundation_for(&self, table: &Table, card: CardId) -> Option<PileId> {
        self.foundations
            .iter()
            .copied()
            .find(|&f| self.fits_foundation(table, card, f))
    }

    /// Waste top card and the foundation it fits, if any.
    fn next_auto_move(&self, table: &Table) -> Option<(CardId, PileId)> {
        let card = table.pile(self.waste).peek()?;
        if !table.card(card).face_up() {
            return None;
        }
        self.foundation_for(table, card).map(|f| (card, f))
    }

    fn auto_moves(&self) -> Steps<Self> {
        if !self.options.auto_move {
            return Steps::new();
        }
        Steps::new().then(|rules: &mut Self, table| match rules.next_auto_move(table) {
            Some((card, foundation)) => {
                table.push(foundation, card);
                Steps::new().pause(DelayHint::OneByOne).append(rules.auto_moves())
            }
            None => Steps::new(),
        })
    }

    fn draw_from_stock(&self) -> Steps<Self> {
        let mut steps =
            Steps::new().then_do(|rules: &mut Self, table| table.set_max_fan(rules.waste, 0));

        for i in 0..self.options.draw_count {
            let last = i + 1 == self.options.draw_count;
            steps = steps.then(move |rules: &mut Self, table| {
                let Some(card) = table.pile(rules.stock).peek() else {
                    return Steps::new();
                };
                table.push(rules.waste, card);
                let fan = i64::from(table.pile(rules.waste).max_fan()) + 1;
                table.set_max_fan(rules.waste, fan);

                let flipped = Steps::new()
                    .pause(DelayHint::Quick)
                    .then_do(move |_, table: &mut Table| table.flip(card, true));
                if last {
                    flipped
                } else {
                    flipped.pause(DelayHint::Quick)
                }
            });
        }

        steps.pause(DelayHint::OneByOne).append(self.auto_moves())
    }

    fn restock(&self) -> Steps<Self> {
        Steps::new()
            .then_do(|rules: &mut Self, table| {
                rules.restocks += 1;
                let waste: Vec<CardId> = table.pile(rules.waste).iter().rev().collect();
                for card in waste {
                    table.flip(card, false);
                }
                table.set_max_fan(rules.waste, 0);
            })
            .pause(DelayHint::OneByOne)
            .then_do(|rules: &mut Self, table| {
                while let Some(card) = table.pile(rules.waste).peek() {
                    table.push(rules.stock, card);
                }
            })
            .pause(DelayHint::OneByOne)
            .append(self.auto_moves())
    }
}

impl Rules for SimpleSolitaire {
    fn is_won(&self, table: &Table) -> bool {
        self.foundations.iter().all(|&f| table.pile(f).len() == 13)
    }

    fn won_cards(&self, table: &Table) -> Vec<CardId> {
        // interleave the foundations level by level
        let mut cards: Vec<CardId> = self
            .foundations
            .iter()
            .flat_map(|&f| table.pile(f).iter())
            .collect();
        cards.sort_by_key(|&c| (table.card(c).pile_index(), table.card(c).rank()));
        cards
    }

    fn restart(&mut self, _table: &Table, mut rng: GameRng) -> Steps<Self> {
        Steps::new()
            .then_do(move |rules: &mut Self, table| {
                rules.restocks = 0;
                let piles: Vec<PileId> = table.pile_ids().collect();
                for pile in piles.into_iter().rev() {
                    if pile == rules.stock {
                        continue;
                    }
                    while let Some(card) = table.pile(pile).peek() {
                        table.push(rules.stock, card);
                    }
                }
                let stock: Vec<CardId> = table.pile(rules.stock).iter().collect();
                for card in stock {
                    table.flip(card, false);
                }
                table.set_max_fan(rules.waste, 0);
                table.sort_pile(rules.stock);
                table.shuffle_pile(rules.stock, &mut rng);
            })
            .pause(DelayHint::Settle)
            .then(|rules: &mut Self, _| rules.auto_moves())
    }

    fn pile_primary(&mut self, table: &Table, pile: PileId) -> Steps<Self> {
        if pile != self.stock {
            return Steps::new();
        }
        if !table.pile(self.stock).is_empty() {
            self.draw_from_stock()
        } else if self.can_restock(table) {
            self.restock()
        } else {
            Steps::new()
        }
    }

    fn card_primary(&mut self, table: &Table, card: CardId) -> Steps<Self> {
        if table.pile(self.stock).peek() == Some(card) {
            return self.draw_from_stock();
        }
        Steps::new()
    }

    fn card_secondary(&mut self, table: &Table, card: CardId) -> Steps<Self> {
        if table.card(card).pile() != self.waste || !self.is_drop_source(table, card) {
            return Steps::new();
        }
        match self.foundation_for(table, card) {
            Some(foundation) => Steps::new()
                .then_do(move |_, table: &mut Table| table.push(foundation, card))
                .pause(DelayHint::OneByOne)
                .append(self.auto_moves()),
            None => Steps::new(),
        }
    }

    fn can_drag(&self, table: &Table, card: CardId) -> DragInfo {
        if self.is_drop_source(table, card) {
            DragInfo::single()
        } else {
            DragInfo::none()
        }
    }

    fn preview_drop(&self, table: &Table, card: CardId, pile: PileId) -> bool {
        self.is_drop_source(table, card) && self.fits_foundation(table, card, pile)
    }

    fn drop_card(&mut self, table: &Table, card: CardId, pile: PileId) -> Steps<Self> {
        if !self.preview_drop(table, card, pile) {
            return Steps::new();
        }
        Steps::new()
            .then_do(move |_, table: &mut Table| table.push(pile, card))
            .pause(DelayHint::OneByOne)
            .append(self.auto_moves())
    }
}

//! Token stream reader and writer.
//!
//! Save data is a flat list of integers. A `SerializationContext` is built
//! for one save or load call: it enumerates the table's cards and piles in
//! arena order to assign their ids, and registers every operation kind at a
//! fixed id. Only the ids are persisted, so a load succeeds only against a
//! table whose cards and piles were built in the same order.

use rustc_hash::FxHashMap;

use crate::core::{CardId, PileId};
use crate::piles::{Table, MAX_FAN};
use crate::undo::{Operation, OperationKind};

use super::error::LoadError;
use super::id_map::IdMap;

/// Reads one operation payload, positioned just after its id.
pub type Deserializer = fn(&mut SerializationContext) -> Result<Operation, LoadError>;

/// Deepest compound nesting accepted when reading.
pub const MAX_NESTING: usize = 16;

pub struct SerializationContext {
    tokens: Vec<i64>,
    cursor: usize,
    cards: IdMap<CardId>,
    piles: IdMap<PileId>,
    kinds: IdMap<OperationKind>,
    deserializers: FxHashMap<u32, Deserializer>,
    depth: usize,
}

impl std::fmt::Debug for SerializationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializationContext")
            .field("tokens", &self.tokens.len())
            .field("cursor", &self.cursor)
            .field("cards", &self.cards.len())
            .field("piles", &self.piles.len())
            .field("depth", &self.depth)
            .finish()
    }
}

impl SerializationContext {
    /// Empty context for writing `table`.
    #[must_use]
    pub fn for_table(table: &Table) -> Self {
        Self::with_tokens(table, Vec::new())
    }

    /// Context for reading `tokens` against `table`.
    #[must_use]
    pub fn with_tokens(table: &Table, tokens: Vec<i64>) -> Self {
        let kinds: IdMap<OperationKind> = OperationKind::ALL.into_iter().collect();
        let deserializers = OperationKind::ALL
            .into_iter()
            .filter_map(|kind| kinds.id_of(kind).map(|id| (id, kind.deserializer())))
            .collect();

        Self {
            tokens,
            cursor: 0,
            cards: table.card_ids().collect(),
            piles: table.pile_ids().collect(),
            kinds,
            deserializers,
            depth: 0,
        }
    }

    /// Parse a JSON integer array.
    pub fn from_json(table: &Table, text: &str) -> Result<Self, LoadError> {
        let tokens: Vec<i64> = serde_json::from_str(text)?;
        Ok(Self::with_tokens(table, tokens))
    }

    /// Decode the bincode form of the token list.
    pub fn from_bytes(table: &Table, bytes: &[u8]) -> Result<Self, LoadError> {
        let tokens: Vec<i64> = bincode::deserialize(bytes)?;
        Ok(Self::with_tokens(table, tokens))
    }

    /// JSON integer array of every token written.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self.tokens.clone()).to_string()
    }

    /// bincode form of every token written.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(&self.tokens)
    }

    #[must_use]
    pub fn tokens(&self) -> &[i64] {
        &self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<i64> {
        self.tokens
    }

    /// Number of cards the ids were assigned over.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Number of piles the ids were assigned over.
    #[must_use]
    pub fn pile_count(&self) -> usize {
        self.piles.len()
    }

    // === Writing ===

    pub fn write(&mut self, token: i64) {
        self.tokens.push(token);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write(i64::from(value));
    }

    pub fn write_index(&mut self, index: usize) {
        self.write(index as i64);
    }

    /// Panics on a card from another table.
    pub fn write_card(&mut self, card: CardId) {
        match self.cards.id_of(card) {
            Some(id) => self.write(i64::from(id)),
            None => panic!("{card} is not registered in this serialization context"),
        }
    }

    /// Panics on a pile from another table.
    pub fn write_pile(&mut self, pile: PileId) {
        match self.piles.id_of(pile) {
            Some(id) => self.write(i64::from(id)),
            None => panic!("{pile} is not registered in this serialization context"),
        }
    }

    /// Write the registered id of `kind`.
    pub fn write_kind(&mut self, kind: OperationKind) {
        match self.kinds.id_of(kind) {
            Some(id) => self.write(i64::from(id)),
            None => panic!("operation kind {kind:?} has no registered id"),
        }
    }

    /// Write the operation's id followed by its payload.
    pub fn write_operation(&mut self, op: &Operation) {
        self.write_kind(op.kind());
        op.write_payload(self);
    }

    // === Reading ===

    /// Tokens not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    pub fn read(&mut self) -> Result<i64, LoadError> {
        let token = *self.tokens.get(self.cursor).ok_or(LoadError::UnexpectedEnd)?;
        self.cursor += 1;
        Ok(token)
    }

    /// Read a token and require `min <= token <= max`.
    pub fn read_range(&mut self, min: i64, max: i64) -> Result<i64, LoadError> {
        let position = self.cursor;
        let value = self.read()?;
        if value < min || value > max {
            return Err(LoadError::OutOfRange {
                position,
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool, LoadError> {
        Ok(self.read_range(0, 1)? == 1)
    }

    pub fn read_u32(&mut self) -> Result<u32, LoadError> {
        Ok(self.read_range(0, i64::from(u32::MAX))? as u32)
    }

    /// A pile offset: at most the number of cards on the table.
    pub fn read_index(&mut self) -> Result<usize, LoadError> {
        Ok(self.read_range(0, self.cards.len() as i64)? as usize)
    }

    pub fn read_max_fan(&mut self) -> Result<u32, LoadError> {
        Ok(self.read_range(0, i64::from(MAX_FAN))? as u32)
    }

    /// An element count, bounded by the tokens left to read.
    pub fn read_count(&mut self) -> Result<usize, LoadError> {
        let bound = self.remaining().saturating_sub(1) as i64;
        Ok(self.read_range(0, bound)? as usize)
    }

    pub fn read_card(&mut self) -> Result<CardId, LoadError> {
        let token = self.read()?;
        self.cards.get(token).ok_or(LoadError::UnknownCard(token))
    }

    pub fn read_pile(&mut self) -> Result<PileId, LoadError> {
        let token = self.read()?;
        self.piles.get(token).ok_or(LoadError::UnknownPile(token))
    }

    /// Read an operation id and look up its kind.
    pub fn read_kind(&mut self) -> Result<OperationKind, LoadError> {
        let token = self.read()?;
        self.kinds.get(token).ok_or(LoadError::UnknownOperation(token))
    }

    /// Read an operation id and dispatch to its deserializer.
    pub fn read_operation(&mut self) -> Result<Operation, LoadError> {
        let token = self.read()?;
        let deserializer = u32::try_from(token)
            .ok()
            .and_then(|id| self.deserializers.get(&id).copied())
            .ok_or(LoadError::UnknownOperation(token))?;
        deserializer(self)
    }

    pub(crate) fn enter_nested(&mut self) -> Result<(), LoadError> {
        if self.depth >= MAX_NESTING {
            return Err(LoadError::NestingTooDeep(MAX_NESTING));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Fail unless every token has been consumed.
    pub fn ensure_at_end(&self) -> Result<(), LoadError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(LoadError::TrailingTokens(n)),
        }
    }
}

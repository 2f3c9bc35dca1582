use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Two-way map between values and the positional ids they are saved under.
///
/// Ids are assigned in insertion order starting at zero.
#[derive(Clone, Debug)]
pub struct IdMap<T> {
    to_id: FxHashMap<T, u32>,
    from_id: Vec<T>,
}

impl<T> Default for IdMap<T> {
    fn default() -> Self {
        Self {
            to_id: FxHashMap::default(),
            from_id: Vec::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> IdMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under the next id. Registering twice keeps the
    /// first id.
    pub fn register(&mut self, value: T) -> u32 {
        if let Some(&id) = self.to_id.get(&value) {
            return id;
        }
        let id = self.from_id.len() as u32;
        self.to_id.insert(value, id);
        self.from_id.push(value);
        id
    }

    #[must_use]
    pub fn id_of(&self, value: T) -> Option<u32> {
        self.to_id.get(&value).copied()
    }

    /// Value registered under `id`. Accepts any integer so callers can pass
    /// raw tokens.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<T> {
        usize::try_from(id).ok().and_then(|i| self.from_id.get(i)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.from_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from_id.is_empty()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for IdMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut map = Self::new();
        for value in iter {
            map.register(value);
        }
        map
    }
}

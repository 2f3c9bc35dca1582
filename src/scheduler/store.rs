//! Where the scheduler persists save data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save data of {len} bytes exceeds the store limit of {limit} bytes")]
    TooLarge { len: usize, limit: usize },

    #[error("save store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent slot for one game's save data.
pub trait SaveStore {
    /// The saved string, if any.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the saved string.
    fn save(&mut self, data: &str) -> Result<(), StoreError>;
}

/// In-memory store, optionally size-limited.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Option<String>,
    limit: Option<usize>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `data`.
    #[must_use]
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Reject saves longer than `limit` bytes.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Successful saves so far.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.limit {
            if data.len() > limit {
                return Err(StoreError::TooLarge {
                    len: data.len(),
                    limit,
                });
            }
        }
        self.data = Some(data.to_owned());
        self.saves += 1;
        Ok(())
    }
}

use thiserror::Error;

/// Save data could not be loaded.
///
/// Every variant is recoverable: the game that attempted the load is left
/// exactly as it was.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("save data is not a JSON integer array: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("binary save data could not be decoded: {0}")]
    Binary(#[from] bincode::Error),

    #[error("unsupported save data format {found}, expected {expected}")]
    UnsupportedFormat { found: i64, expected: i64 },

    #[error("save data ended early")]
    UnexpectedEnd,

    #[error("token {value} at position {position} is outside {min}..={max}")]
    OutOfRange {
        position: usize,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("unknown card id {0}")]
    UnknownCard(i64),

    #[error("unknown pile id {0}")]
    UnknownPile(i64),

    #[error("unknown operation id {0}")]
    UnknownOperation(i64),

    #[error("history entry is not a compound operation")]
    NotCompound,

    #[error("compound operations nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("{0} unread tokens after the end of save data")]
    TrailingTokens(usize),

    #[error("pile layout does not place every card exactly once")]
    InvalidLayout,

    #[error("undo history does not replay against the saved layout")]
    InconsistentHistory,
}

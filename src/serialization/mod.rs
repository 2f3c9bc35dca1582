//! Save data: the token stream codec, id maps and the persisted layout.

pub mod context;
pub mod error;
pub mod id_map;
pub mod save;

pub use context::{Deserializer, SerializationContext, MAX_NESTING};
pub use error::LoadError;
pub use id_map::IdMap;
pub use save::{PileLayout, SaveData, SAVE_DATA_FORMAT};

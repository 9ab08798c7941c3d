pub mod json;
pub mod memory;
pub mod mirror;
pub mod traits;

pub use json::JsonDirStore;
pub use memory::MemoryStore;
pub use mirror::{PersistenceMirror, BOOKINGS_KEY};
pub use traits::KeyValueStore;

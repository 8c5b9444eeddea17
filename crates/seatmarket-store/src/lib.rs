pub mod storage;
pub mod store;

pub use storage::{keys, JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::SeatStore;

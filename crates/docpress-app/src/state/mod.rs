/*
[INPUT]:  Data directory and persisted records
[OUTPUT]: Key/value storage used for the session mirror
[POS]:    State layer - local persisted state
[UPDATE]: When adding storage backends
*/

pub mod storage;

pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};

//! Persistence adapters implementing `hotai_core::storage::KeyValueStore`.

mod file_store;
mod memory_store;

pub use file_store::{FileKeyValueStore, FileStoreError};
pub use memory_store::MemoryKeyValueStore;

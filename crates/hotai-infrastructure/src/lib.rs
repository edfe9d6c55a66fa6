//! Persistence layer: key-value adapters, historical DTOs, schema migration
//! and the composition root that hydrates the reactive stores.

pub mod config_service;
pub mod dto;
pub mod migration;
pub mod paths;
pub mod persist_observer;
pub mod storage;

pub use config_service::ConfigService;
pub use migration::{CURRENT_SCHEMA_VERSION, MigrationEngine, MigrationReport};
pub use paths::HotaiPaths;
pub use persist_observer::PersistObserver;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};

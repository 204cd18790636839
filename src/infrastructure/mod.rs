//! Infrastructure layer - Stores, persistence, and configuration

pub mod config;
pub mod file_store;
pub mod redis_store;
pub mod repository;
pub mod store;
pub mod workspace;

pub use config::{Backend, Config};
pub use file_store::FileStore;
pub use redis_store::RedisStore;
pub use repository::NoteRepository;
pub use store::{KeyValueStore, Keyspace, MemoryStore};
pub use workspace::Workspace;

//! In-memory storage adapters.

mod in_memory_path_repository;
mod in_memory_session_store;

pub use in_memory_path_repository::InMemoryPathRepository;
pub use in_memory_session_store::InMemorySessionStore;

//! Repository implementations.
//!
//! # Backends
//!
//! - [`PgLinkRepository`] / [`PgClickRepository`] - PostgreSQL via SQLx
//! - [`MemoryStore`] - Process-local, implements both traits

pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory_store::MemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;

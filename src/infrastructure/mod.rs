//! Infrastructure layer for external integrations.
//!
//! Implements the repository traits defined by the domain layer and the
//! redirect cache.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod cache;
pub mod persistence;

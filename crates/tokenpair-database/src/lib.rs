//! # tokenpair-database
//!
//! Session store implementations: a PostgreSQL store backed by a sqlx
//! connection pool, and an in-memory store for tests and single-node
//! development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemorySessionStore;
pub use provider::build_session_store;
pub use repositories::session::PgSessionStore;

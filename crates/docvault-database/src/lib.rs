//! # docvault-database
//!
//! Metadata repository layer for DocVault: the [`FileStore`] boundary
//! trait, a PostgreSQL implementation, an in-memory implementation for
//! single-node and test use, and connection pool management.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::InMemoryFileStore;
pub use repositories::file::PgFileStore;
pub use store::FileStore;

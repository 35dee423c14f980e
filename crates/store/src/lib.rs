//! Storage adapters for the storefront repository ports.
//!
//! [`PostgresStore`] is the production backend; [`InMemoryStore`] mirrors its
//! semantics for tests and database-less runs.

pub mod entity;
pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

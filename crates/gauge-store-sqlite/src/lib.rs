//! SQLite backend for the Gauge dashboard store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Referential cascades and the series
//! range invariant are enforced by the engine itself (foreign keys and a
//! table-level CHECK), never by application pre-reads.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

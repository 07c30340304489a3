//! SQLite backend for the tenki forecast cache.
//!
//! Wraps [`tokio_rusqlite`] so database access runs off the async runtime.
//! No connection outlives a single store operation.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

//! SQLite backend for the Muster schedule store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. This crate owns every line of SQL in
//! the system — callers go through [`muster_core::store::ScheduleStore`] and
//! never issue raw queries.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

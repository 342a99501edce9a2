//! Error type for `muster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] muster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A venue already exists under this name with a different address.
  /// Distinct from a storage fault so callers can map it to an
  /// "already exists" response; the same-address case is merged silently.
  #[error("venue {name:?} exists at {existing:?}, cannot update to {requested:?}")]
  VenueAddressConflict {
    name:      String,
    existing:  String,
    requested: String,
  },

  /// An event with this name already exists. Never merged.
  #[error("event name already exists: {0:?}")]
  DuplicateEventName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

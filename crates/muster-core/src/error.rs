//! Error types for `muster-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("yyyymmdd validation: {0:?}")]
  InvalidDate(String),

  #[error("hhmm validation: {0:?}")]
  InvalidTime(String),

  #[error("duration validation: {0:?}")]
  InvalidDuration(String),

  /// A stored or submitted attend value outside `{-1, 0, 1}`.
  #[error("attend value out of range: {0}")]
  InvalidAttend(i64),

  /// A malformed event-import config (bad JSON, or a chosen-slot index that
  /// does not point into the slot list).
  #[error("event config: {0}")]
  Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

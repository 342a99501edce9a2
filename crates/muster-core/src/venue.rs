//! Venue — a named location events are held at.

use serde::{Deserialize, Serialize};

/// A place where events happen.
///
/// Venue names are a global uniqueness domain. A venue is immutable once
/// created; re-creating with the same name and address is idempotent, while
/// the same name with a different address is a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
  pub id:      i64,
  pub name:    String,
  pub address: String,
}

//! RSVP answers and the aggregate shapes built from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A participant's answer for one slot, stored as an integer in the
/// `attend` column: `1` yes, `0` undecided, `-1` no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attend {
  Yes,
  Undecided,
  No,
}

impl Attend {
  /// The integer representation stored in the database.
  pub fn value(self) -> i64 {
    match self {
      Self::Yes => 1,
      Self::Undecided => 0,
      Self::No => -1,
    }
  }

  /// Decode a stored integer, rejecting anything outside the known range
  /// rather than propagating a loosely typed value.
  pub fn from_value(value: i64) -> Result<Self> {
    match value {
      1 => Ok(Self::Yes),
      0 => Ok(Self::Undecided),
      -1 => Ok(Self::No),
      other => Err(Error::InvalidAttend(other)),
    }
  }
}

impl Serialize for Attend {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(self.value())
  }
}

impl<'de> Deserialize<'de> for Attend {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = i64::deserialize(d)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}

/// Per-slot counts of each observed answer value: slot id to attend value
/// to the number of distinct participants who gave it.
pub type RsvpSummary = HashMap<i64, HashMap<i64, i64>>;

/// Per-slot raw answers: slot id to participant id to their answer.
/// Organizer-only; no default fill.
pub type RsvpDetail = HashMap<i64, HashMap<i64, Attend>>;

//! Slot — a candidate date/time/duration proposed for an event.

use serde::{Deserialize, Serialize};

use crate::rsvp::Attend;

/// A candidate time for an event. Slots are created through the engine
/// (which validates formats and back-fills standing declines) and are never
/// edited or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
  pub id:       i64,
  pub event:    i64,
  pub yyyymmdd: String,
  pub hhmm:     String,
  pub duration: String,
}

/// A slot joined to the requesting participant's RSVP.
///
/// `attend` is `None` on anonymous reads; when a requester is known it is
/// always `Some`, defaulting to [`Attend::Undecided`] where no RSVP row
/// exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRsvp {
  pub id:       i64,
  pub event:    i64,
  pub yyyymmdd: String,
  pub hhmm:     String,
  pub duration: String,
  pub attend:   Option<Attend>,
}

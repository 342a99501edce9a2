//! Participant — a person who answers availability queries.

use serde::{Deserialize, Serialize};

/// A registered participant. Names are globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub id:        i64,
  pub name:      String,
  /// Free-text grouping; updates go through the controlled `sections`
  /// vocabulary.
  pub section:   String,
  /// Grants visibility into per-participant RSVP detail across events.
  pub organizer: bool,
  /// Edit rights over event descriptions: `0` none, `-1` any event,
  /// `> 0` only events held at that venue id.
  pub editor:    i64,
  /// Case-insensitive lookup key for identity mapping; empty when unset.
  pub email:     String,
}

/// Input to `create_participant`. All fields default to empty/zero;
/// `id` pins the row id when aligning with an external identity system.
#[derive(Debug, Clone, Default)]
pub struct NewParticipant {
  pub id:        Option<i64>,
  pub section:   String,
  pub organizer: bool,
  pub editor:    i64,
  pub email:     String,
}

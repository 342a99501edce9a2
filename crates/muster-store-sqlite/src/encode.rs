//! Decoding helpers between raw SQLite rows and `muster-core` domain types.
//!
//! Every query reads into one of these raw structs and converts in a single
//! decoding step; a row that fails to match the expected shape is rejected
//! instead of flowing onward loosely typed.

use muster_core::{
  participant::Participant,
  rsvp::Attend,
  slot::{Slot, SlotRsvp},
};

use crate::Result;

/// Raw `participants` row. `section` and `email` may be NULL for rows
/// created before those columns carried defaults; both read as empty.
pub struct RawParticipant {
  pub id:        i64,
  pub name:      String,
  pub section:   Option<String>,
  pub organizer: i64,
  pub editor:    i64,
  pub email:     Option<String>,
}

impl RawParticipant {
  pub fn into_participant(self) -> Participant {
    Participant {
      id:        self.id,
      name:      self.name,
      section:   self.section.unwrap_or_default(),
      organizer: self.organizer != 0,
      editor:    self.editor,
      email:     self.email.unwrap_or_default(),
    }
  }
}

/// Raw `slots` row without any RSVP join.
pub struct RawSlot {
  pub id:       i64,
  pub event:    i64,
  pub yyyymmdd: String,
  pub hhmm:     String,
  pub duration: String,
}

impl RawSlot {
  pub fn into_slot(self) -> Slot {
    Slot {
      id:       self.id,
      event:    self.event,
      yyyymmdd: self.yyyymmdd,
      hhmm:     self.hhmm,
      duration: self.duration,
    }
  }

  /// The anonymous read shape: no requester, no attend value.
  pub fn into_slot_rsvp(self) -> SlotRsvp {
    SlotRsvp {
      id:       self.id,
      event:    self.event,
      yyyymmdd: self.yyyymmdd,
      hhmm:     self.hhmm,
      duration: self.duration,
      attend:   None,
    }
  }
}

/// Raw `slots` row left-joined to the requesting participant's RSVP.
pub struct RawSlotRsvp {
  pub id:       i64,
  pub event:    i64,
  pub yyyymmdd: String,
  pub hhmm:     String,
  pub duration: String,
  pub attend:   Option<i64>,
}

impl RawSlotRsvp {
  /// An absent join row reads as an undecided answer.
  pub fn into_slot_rsvp(self) -> Result<SlotRsvp> {
    let attend = Attend::from_value(self.attend.unwrap_or(0))?;
    Ok(SlotRsvp {
      id:       self.id,
      event:    self.event,
      yyyymmdd: self.yyyymmdd,
      hhmm:     self.hhmm,
      duration: self.duration,
      attend:   Some(attend),
    })
  }
}

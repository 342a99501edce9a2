//! The `ScheduleStore` trait and its result shapes.
//!
//! The trait is implemented by storage backends (e.g. `muster-store-sqlite`)
//! and is the seam between the availability engine and its callers: callers
//! never issue queries of their own, every read and write is one of these
//! operations against an explicitly passed store handle.

use std::{collections::HashMap, future::Future};

use crate::{
  event::{Event, EventConfig},
  participant::{NewParticipant, Participant},
  rsvp::{Attend, RsvpDetail, RsvpSummary},
  slot::Slot,
  venue::Venue,
};

/// Abstraction over a Muster schedule store backend.
///
/// Entity ids are store-assigned positive integers, opaque to callers.
/// Read operations report absence as `None`/empty, never as an error, and
/// permission denials as boolean/empty outcomes so that existence cannot be
/// probed through error asymmetry.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Venues ────────────────────────────────────────────────────────────

  /// Create a venue and return its id.
  ///
  /// Re-creating with the same name and address returns the existing id;
  /// the same name with a different address is a conflict error. Exactly
  /// one row per name ever exists.
  fn create_venue<'a>(
    &'a self,
    name: &'a str,
    address: &'a str,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Fetch a venue by id. `None` if not found.
  fn get_venue(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Venue>, Self::Error>> + Send + '_;

  /// Fetch a venue by its unique name. `None` if not found.
  fn get_venue_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Venue>, Self::Error>> + Send + 'a;

  /// List every venue.
  fn list_venues(
    &self,
  ) -> impl Future<Output = Result<Vec<Venue>, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  /// Create an event and return its id. A duplicate name is an error —
  /// intentionally asymmetric from venue creation, since two events are
  /// never presumed identical.
  fn create_event<'a>(
    &'a self,
    name: &'a str,
    venue: i64,
    description: &'a str,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Create an event, its slots, and optionally close it on one of them,
  /// from a parsed [`EventConfig`]. All slot formats are validated before
  /// any write.
  fn import_event<'a>(
    &'a self,
    config: &'a EventConfig,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Replace an event's description, gated on the author's editor rights.
  ///
  /// Returns `false` (not an error) when the author has no rights, is
  /// scoped to a different venue, or either row is missing.
  fn edit_event<'a>(
    &'a self,
    event: i64,
    author: i64,
    description: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Fix the event's winning slot (`slot > 0`), or close it with no winner
  /// (`slot <= 0`).
  ///
  /// The caller is responsible for passing a slot that belongs to the
  /// event; the engine does not re-validate this on the hot path.
  fn close_event(
    &self,
    event: i64,
    slot: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Assemble the read model for one event. `None` when the event does not
  /// exist.
  ///
  /// With a requesting `participant`, each slot carries that participant's
  /// answer (undecided where none is recorded) and the `editable` flag
  /// reflects their editor rights.
  fn get_event(
    &self,
    event: i64,
    participant: Option<i64>,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// All event ids, unfiltered and unpaginated.
  fn get_events(
    &self,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// Distinct ids of events with at least one slot on or after `yyyymmdd`.
  /// Events with no slots at all are never returned by this path.
  fn get_events_after<'a>(
    &'a self,
    yyyymmdd: &'a str,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + 'a;

  // ── Participants ──────────────────────────────────────────────────────

  /// Create a participant, honoring a caller-supplied id when `opts.id` is
  /// set. Returns the participant id.
  fn create_participant<'a>(
    &'a self,
    name: &'a str,
    opts: NewParticipant,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Fetch a participant by id. `None` if not found.
  fn get_participant(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  /// Look up a participant id by exact name. `None` if not found.
  fn participant_id_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  /// Look up a participant id by email, trimmed and case-insensitive.
  /// `None` if not found.
  fn participant_id_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  /// Move a participant to `section`, but only if the lowercased name is
  /// present in the controlled vocabulary; otherwise a no-op. Returns the
  /// participant's section after the attempt, or `None` for an unknown
  /// participant.
  fn update_section<'a>(
    &'a self,
    participant: i64,
    section: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Add a section name (lowercased) to the controlled vocabulary.
  /// Idempotent.
  fn add_section<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Slots ─────────────────────────────────────────────────────────────

  /// Validate the three formats, insert the slot, then back-fill a decline
  /// for every participant with a standing never-declaration on that date.
  /// Returns the new slot id.
  fn create_slot<'a>(
    &'a self,
    event: i64,
    yyyymmdd: &'a str,
    hhmm: &'a str,
    duration: &'a str,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Fetch a slot by id. `None` if not found.
  fn get_slot(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Slot>, Self::Error>> + Send + '_;

  // ── RSVPs ─────────────────────────────────────────────────────────────

  /// Record an answer for `(event, participant, slot)`, replacing any prior
  /// answer for the same key (last write wins, no history). Returns the
  /// row id of the surviving answer.
  fn rsvp(
    &self,
    event: i64,
    participant: i64,
    slot: i64,
    attend: Attend,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// The participant's current answers for one event, keyed by slot id.
  fn get_rsvps(
    &self,
    event: i64,
    participant: i64,
  ) -> impl Future<Output = Result<HashMap<i64, Attend>, Self::Error>> + Send + '_;

  // ── Never-declarations ────────────────────────────────────────────────

  /// Idempotently record that the participant is unavailable on a calendar
  /// date, then overwrite their answer to `No` for every existing slot on
  /// that date (replacing prior explicit answers).
  fn declare_never<'a>(
    &'a self,
    participant: i64,
    yyyymmdd: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The participant's never-dates, optionally only those strictly after
  /// `since`.
  fn get_nevers<'a>(
    &'a self,
    participant: i64,
    since: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  // ── Aggregation ───────────────────────────────────────────────────────

  /// Count distinct participants per `(slot, answer)` for the event.
  ///
  /// When a requesting participant is supplied, their undecided answers are
  /// first materialised for every slot of the event (insert-if-absent) so
  /// they appear in the counts. Participants who never interacted with the
  /// event remain invisible.
  fn summarize_rsvps(
    &self,
    event: i64,
    participant: Option<i64>,
  ) -> impl Future<Output = Result<RsvpSummary, Self::Error>> + Send + '_;

  /// Per-participant raw answers for the event, organizer-only.
  ///
  /// A non-organizer requester receives an empty map, not an error.
  fn collect_rsvps(
    &self,
    event: i64,
    requester: i64,
  ) -> impl Future<Output = Result<RsvpDetail, Self::Error>> + Send + '_;

  // ── Key/value ─────────────────────────────────────────────────────────

  /// Read an out-of-band metadata value. `None` if the key is absent.
  fn get_value<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Write (upsert) an out-of-band metadata value.
  fn set_value<'a>(
    &'a self,
    key: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

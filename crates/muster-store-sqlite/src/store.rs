//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use muster_core::{
  event::{Event, EventConfig},
  participant::{NewParticipant, Participant},
  rsvp::{Attend, RsvpDetail, RsvpSummary},
  slot::{Slot, SlotRsvp},
  store::ScheduleStore,
  validate::{
    canonical_yyyymmdd, validate_duration, validate_hhmm, validate_yyyymmdd,
  },
  venue::Venue,
};

use crate::{
  encode::{RawParticipant, RawSlot, RawSlotRsvp},
  schema::SCHEMA,
  Error, Result,
};

/// Sentinel stored in `events.date_time` for "closed with no winner".
/// Distinguishable from both NULL (open) and any real slot id, which are
/// always positive.
const CLOSED_NO_WINNER: i64 = -1;

fn now_millis() -> i64 { Utc::now().timestamp_millis() }

/// True when `err` is the UNIQUE-constraint failure naming `column`
/// (e.g. `"venues.name"`). Any other constraint violation is an
/// unanticipated storage fault and propagates unmodified.
fn unique_violation(err: &rusqlite::Error, column: &str) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(f, Some(msg))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && msg.contains(column)
  )
}

/// Outcome of the venue insert attempt, resolved outside the call closure.
enum VenueWrite {
  Created(i64),
  Conflict(Venue),
}

/// Outcome of the event insert attempt.
enum EventWrite {
  Created(i64),
  Duplicate,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Muster schedule store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Venues ────────────────────────────────────────────────────────────────

  async fn create_venue(&self, name: &str, address: &str) -> Result<i64> {
    debug!(name, address, "create_venue");
    let name_param = name.to_owned();
    let address_param = address.to_owned();

    let outcome = self
      .conn
      .call(move |conn| {
        let insert = conn.execute(
          "INSERT INTO venues (name, address) VALUES (?1, ?2)",
          rusqlite::params![name_param, address_param],
        );
        match insert {
          Ok(_) => Ok(VenueWrite::Created(conn.last_insert_rowid())),
          Err(err) if unique_violation(&err, "venues.name") => {
            let existing = conn.query_row(
              "SELECT rowid, name, address FROM venues WHERE name = ?1",
              rusqlite::params![name_param],
              |row| {
                Ok(Venue {
                  id:      row.get(0)?,
                  name:    row.get(1)?,
                  address: row.get(2)?,
                })
              },
            )?;
            Ok(VenueWrite::Conflict(existing))
          }
          Err(err) => Err(err.into()),
        }
      })
      .await?;

    match outcome {
      VenueWrite::Created(id) => Ok(id),
      // Idempotent create: same name, same address.
      VenueWrite::Conflict(v) if v.address == address => Ok(v.id),
      VenueWrite::Conflict(v) => Err(Error::VenueAddressConflict {
        name:      name.to_owned(),
        existing:  v.address,
        requested: address.to_owned(),
      }),
    }
  }

  async fn get_venue(&self, id: i64) -> Result<Option<Venue>> {
    let venue = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid, name, address FROM venues WHERE rowid = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Venue {
                  id:      row.get(0)?,
                  name:    row.get(1)?,
                  address: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(venue)
  }

  async fn get_venue_by_name(&self, name: &str) -> Result<Option<Venue>> {
    let name = name.to_owned();
    let venue = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid, name, address FROM venues WHERE name = ?1",
              rusqlite::params![name],
              |row| {
                Ok(Venue {
                  id:      row.get(0)?,
                  name:    row.get(1)?,
                  address: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(venue)
  }

  async fn list_venues(&self) -> Result<Vec<Venue>> {
    let venues = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT rowid, name, address FROM venues")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Venue {
              id:      row.get(0)?,
              name:    row.get(1)?,
              address: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(venues)
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn create_event(
    &self,
    name: &str,
    venue: i64,
    description: &str,
  ) -> Result<i64> {
    debug!(name, venue, "create_event");
    let name_param = name.to_owned();
    let description = description.to_owned();

    let outcome = self
      .conn
      .call(move |conn| {
        let insert = conn.execute(
          "INSERT INTO events (name, description, venue) VALUES (?1, ?2, ?3)",
          rusqlite::params![name_param, description, venue],
        );
        match insert {
          Ok(_) => Ok(EventWrite::Created(conn.last_insert_rowid())),
          Err(err) if unique_violation(&err, "events.name") => {
            Ok(EventWrite::Duplicate)
          }
          Err(err) => Err(err.into()),
        }
      })
      .await?;

    match outcome {
      EventWrite::Created(id) => Ok(id),
      EventWrite::Duplicate => Err(Error::DuplicateEventName(name.to_owned())),
    }
  }

  async fn import_event(&self, config: &EventConfig) -> Result<i64> {
    debug!(name = config.name, "import_event");

    // Fail fast on every slot and the chosen index before any write.
    for slot in &config.slots {
      validate_yyyymmdd(&slot.yyyymmdd)?;
      validate_hhmm(&slot.hhmm)?;
      validate_duration(&slot.duration)?;
    }
    if let Some(index) = config.chosen {
      if index >= config.slots.len() {
        return Err(
          muster_core::Error::Config(format!(
            "chosen slot index {index} out of range ({} slots)",
            config.slots.len()
          ))
          .into(),
        );
      }
    }

    let event = self
      .create_event(&config.name, config.venue, &config.description)
      .await?;

    let mut slot_ids = Vec::with_capacity(config.slots.len());
    for slot in &config.slots {
      let id = self
        .create_slot(event, &slot.yyyymmdd, &slot.hhmm, &slot.duration)
        .await?;
      slot_ids.push(id);
    }

    if let Some(index) = config.chosen {
      self.close_event(event, slot_ids[index]).await?;
    }

    Ok(event)
  }

  async fn edit_event(
    &self,
    event: i64,
    author: i64,
    description: &str,
  ) -> Result<bool> {
    debug!(event, author, "edit_event");
    let description = description.to_owned();

    let updated = self
      .conn
      .call(move |conn| {
        let editor: Option<i64> = conn
          .query_row(
            "SELECT editor FROM participants WHERE rowid = ?1",
            rusqlite::params![author],
            |row| row.get(0),
          )
          .optional()?;

        let Some(editor) = editor else {
          return Ok(false);
        };
        if editor == 0 {
          return Ok(false);
        }

        let count = if editor < 0 {
          conn.execute(
            "UPDATE events SET description = ?1 WHERE rowid = ?2",
            rusqlite::params![description, event],
          )?
        } else {
          // Venue-scoped editor: the event's venue must match.
          conn.execute(
            "UPDATE events SET description = ?1 \
             WHERE rowid = ?2 AND venue = ?3",
            rusqlite::params![description, event, editor],
          )?
        };
        Ok(count > 0)
      })
      .await?;
    Ok(updated)
  }

  async fn close_event(&self, event: i64, slot: i64) -> Result<()> {
    debug!(event, slot, "close_event");
    let chosen = if slot > 0 { slot } else { CLOSED_NO_WINNER };
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE events SET date_time = ?1 WHERE rowid = ?2",
          rusqlite::params![chosen, event],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_event(
    &self,
    event: i64,
    participant: Option<i64>,
  ) -> Result<Option<Event>> {
    debug!(event, ?participant, "get_event");

    let header = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid, name, description, venue, date_time \
               FROM events WHERE rowid = ?1",
              rusqlite::params![event],
              |row| {
                Ok((
                  row.get::<_, i64>(0)?,
                  row.get::<_, String>(1)?,
                  row.get::<_, String>(2)?,
                  row.get::<_, i64>(3)?,
                  row.get::<_, Option<i64>>(4)?,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    let Some((id, name, description, venue, date_time)) = header else {
      return Ok(None);
    };

    let slots: Vec<SlotRsvp> = match participant {
      Some(user) => {
        let raws = self
          .conn
          .call(move |conn| {
            let mut stmt = conn.prepare(
              "SELECT s.rowid, s.event, s.yyyymmdd, s.hhmm, s.duration, \
                      r.attend \
               FROM slots s \
               LEFT JOIN (SELECT slot, attend FROM rsvps \
                          WHERE event = ?1 AND participant = ?2) r \
                 ON s.rowid = r.slot \
               WHERE s.event = ?1",
            )?;
            let rows = stmt
              .query_map(rusqlite::params![event, user], |row| {
                Ok(RawSlotRsvp {
                  id:       row.get(0)?,
                  event:    row.get(1)?,
                  yyyymmdd: row.get(2)?,
                  hhmm:     row.get(3)?,
                  duration: row.get(4)?,
                  attend:   row.get(5)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
          })
          .await?;
        raws
          .into_iter()
          .map(RawSlotRsvp::into_slot_rsvp)
          .collect::<Result<_>>()?
      }
      None => {
        let raws = self
          .conn
          .call(move |conn| {
            let mut stmt = conn.prepare(
              "SELECT rowid, event, yyyymmdd, hhmm, duration \
               FROM slots WHERE event = ?1",
            )?;
            let rows = stmt
              .query_map(rusqlite::params![event], |row| {
                Ok(RawSlot {
                  id:       row.get(0)?,
                  event:    row.get(1)?,
                  yyyymmdd: row.get(2)?,
                  hhmm:     row.get(3)?,
                  duration: row.get(4)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
          })
          .await?;
        raws.into_iter().map(RawSlot::into_slot_rsvp).collect()
      }
    };

    let editable = match participant {
      Some(user) => {
        let editor: Option<i64> = self
          .conn
          .call(move |conn| {
            Ok(
              conn
                .query_row(
                  "SELECT editor FROM participants WHERE rowid = ?1",
                  rusqlite::params![user],
                  |row| row.get(0),
                )
                .optional()?,
            )
          })
          .await?;
        editor.is_some_and(|e| e < 0 || (e > 0 && e == venue))
      }
      None => false,
    };

    // A concrete date_time resolves to the matching slot object; the
    // closed-no-winner sentinel presents as undecided, same as open.
    let chosen = date_time
      .filter(|&dt| dt > 0)
      .and_then(|dt| slots.iter().find(|s| s.id == dt).cloned());

    Ok(Some(Event {
      id,
      name,
      description,
      venue,
      editable,
      chosen,
      slots,
    }))
  }

  async fn get_events(&self) -> Result<Vec<i64>> {
    let ids = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT rowid FROM events")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }

  async fn get_events_after(&self, yyyymmdd: &str) -> Result<Vec<i64>> {
    let date = canonical_yyyymmdd(yyyymmdd)?;
    debug!(date, "get_events_after");
    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT event FROM slots WHERE yyyymmdd >= ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![date], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }

  // ── Participants ──────────────────────────────────────────────────────────

  async fn create_participant(
    &self,
    name: &str,
    opts: NewParticipant,
  ) -> Result<i64> {
    debug!(name, "create_participant");
    let name = name.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        match opts.id {
          Some(id) => conn.execute(
            "INSERT INTO participants \
               (rowid, name, section, organizer, editor, email) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              id,
              name,
              opts.section,
              opts.organizer,
              opts.editor,
              opts.email
            ],
          )?,
          None => conn.execute(
            "INSERT INTO participants \
               (name, section, organizer, editor, email) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              name,
              opts.section,
              opts.organizer,
              opts.editor,
              opts.email
            ],
          )?,
        };
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn get_participant(&self, id: i64) -> Result<Option<Participant>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid, name, section, organizer, editor, email \
               FROM participants WHERE rowid = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawParticipant {
                  id:        row.get(0)?,
                  name:      row.get(1)?,
                  section:   row.get(2)?,
                  organizer: row.get(3)?,
                  editor:    row.get(4)?,
                  email:     row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw.map(RawParticipant::into_participant))
  }

  async fn participant_id_by_name(&self, name: &str) -> Result<Option<i64>> {
    let name = name.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid FROM participants WHERE name = ?1",
              rusqlite::params![name],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id)
  }

  async fn participant_id_by_email(&self, email: &str) -> Result<Option<i64>> {
    let email = email.trim().to_owned();
    let id = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid FROM participants WHERE lower(email) = lower(?1)",
              rusqlite::params![email],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id)
  }

  async fn update_section(
    &self,
    participant: i64,
    section: &str,
  ) -> Result<Option<String>> {
    debug!(participant, section, "update_section");
    let target = section.to_lowercase();

    let current = self
      .conn
      .call(move |conn| {
        let known: Option<String> = conn
          .query_row(
            "SELECT name FROM sections WHERE name = ?1",
            rusqlite::params![target],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(name) = known {
          let count = conn.execute(
            "UPDATE participants SET section = ?1 WHERE rowid = ?2",
            rusqlite::params![name, participant],
          )?;
          if count > 0 {
            return Ok(Some(name));
          }
          return Ok(None);
        }

        // Unknown section: no-op, report the current value unchanged.
        let current = conn
          .query_row(
            "SELECT section FROM participants WHERE rowid = ?1",
            rusqlite::params![participant],
            |row| row.get::<_, Option<String>>(0),
          )
          .optional()?;
        Ok(current.map(Option::unwrap_or_default))
      })
      .await?;
    Ok(current)
  }

  async fn add_section(&self, name: &str) -> Result<()> {
    let name = name.to_lowercase();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO sections (name) VALUES (?1)",
          rusqlite::params![name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Slots ─────────────────────────────────────────────────────────────────

  async fn create_slot(
    &self,
    event: i64,
    yyyymmdd: &str,
    hhmm: &str,
    duration: &str,
  ) -> Result<i64> {
    validate_yyyymmdd(yyyymmdd)?;
    validate_hhmm(hhmm)?;
    validate_duration(duration)?;
    debug!(event, yyyymmdd, hhmm, duration, "create_slot");

    let yyyymmdd = yyyymmdd.to_owned();
    let hhmm = hhmm.to_owned();
    let duration = duration.to_owned();
    let ts = now_millis();

    let slot = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO slots (event, yyyymmdd, hhmm, duration) \
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![event, yyyymmdd, hhmm, duration],
        )?;
        let slot = conn.last_insert_rowid();

        // Back-fill a decline for everyone with a standing never on this
        // date. Insert-only: an explicit prior answer for the pair is kept.
        conn.execute(
          "INSERT OR IGNORE INTO rsvps \
             (event, participant, slot, attend, timestamp) \
           SELECT ?1, participant, ?2, -1, ?3 \
           FROM nevers WHERE yyyymmdd = ?4",
          rusqlite::params![event, slot, ts, yyyymmdd],
        )?;
        Ok(slot)
      })
      .await?;
    Ok(slot)
  }

  async fn get_slot(&self, id: i64) -> Result<Option<Slot>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT rowid, event, yyyymmdd, hhmm, duration \
               FROM slots WHERE rowid = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawSlot {
                  id:       row.get(0)?,
                  event:    row.get(1)?,
                  yyyymmdd: row.get(2)?,
                  hhmm:     row.get(3)?,
                  duration: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw.map(RawSlot::into_slot))
  }

  // ── RSVPs ─────────────────────────────────────────────────────────────────

  async fn rsvp(
    &self,
    event: i64,
    participant: i64,
    slot: i64,
    attend: Attend,
  ) -> Result<i64> {
    debug!(event, participant, slot, attend = attend.value(), "rsvp");
    let ts = now_millis();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rsvps (event, participant, slot, attend, timestamp) \
           VALUES (?1, ?2, ?3, ?4, ?5) \
           ON CONFLICT (event, participant, slot) \
           DO UPDATE SET attend = excluded.attend, \
                         timestamp = excluded.timestamp",
          rusqlite::params![event, participant, slot, attend.value(), ts],
        )?;
        let id = conn.query_row(
          "SELECT rowid FROM rsvps \
           WHERE event = ?1 AND participant = ?2 AND slot = ?3",
          rusqlite::params![event, participant, slot],
          |row| row.get(0),
        )?;
        Ok(id)
      })
      .await?;
    Ok(id)
  }

  async fn get_rsvps(
    &self,
    event: i64,
    participant: i64,
  ) -> Result<HashMap<i64, Attend>> {
    let rows: Vec<(i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT slot, attend FROM rsvps \
           WHERE event = ?1 AND participant = ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![event, participant], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(slot, attend)| Ok((slot, Attend::from_value(attend)?)))
      .collect()
  }

  // ── Never-declarations ────────────────────────────────────────────────────

  async fn declare_never(
    &self,
    participant: i64,
    yyyymmdd: &str,
  ) -> Result<()> {
    validate_yyyymmdd(yyyymmdd)?;
    debug!(participant, yyyymmdd, "declare_never");
    let yyyymmdd = yyyymmdd.to_owned();
    let ts = now_millis();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO nevers (participant, yyyymmdd) \
           VALUES (?1, ?2)",
          rusqlite::params![participant, yyyymmdd],
        )?;

        // Replace-on-conflict: a standing decline overrides any prior
        // explicit answer for slots that already exist on this date.
        conn.execute(
          "INSERT OR REPLACE INTO rsvps \
             (event, participant, slot, attend, timestamp) \
           SELECT event, ?1, rowid, -1, ?2 \
           FROM slots WHERE yyyymmdd = ?3",
          rusqlite::params![participant, ts, yyyymmdd],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_nevers(
    &self,
    participant: i64,
    since: Option<&str>,
  ) -> Result<Vec<String>> {
    let since = since.map(canonical_yyyymmdd).transpose()?;

    let dates = self
      .conn
      .call(move |conn| {
        let rows = match since {
          Some(since) => {
            let mut stmt = conn.prepare(
              "SELECT yyyymmdd FROM nevers \
               WHERE participant = ?1 AND yyyymmdd > ?2 \
               ORDER BY yyyymmdd",
            )?;
            stmt
              .query_map(rusqlite::params![participant, since], |row| {
                row.get(0)
              })?
              .collect::<rusqlite::Result<Vec<String>>>()?
          }
          None => {
            let mut stmt = conn.prepare(
              "SELECT yyyymmdd FROM nevers \
               WHERE participant = ?1 ORDER BY yyyymmdd",
            )?;
            stmt
              .query_map(rusqlite::params![participant], |row| row.get(0))?
              .collect::<rusqlite::Result<Vec<String>>>()?
          }
        };
        Ok(rows)
      })
      .await?;
    Ok(dates)
  }

  // ── Aggregation ───────────────────────────────────────────────────────────

  async fn summarize_rsvps(
    &self,
    event: i64,
    participant: Option<i64>,
  ) -> Result<RsvpSummary> {
    debug!(event, ?participant, "summarize_rsvps");
    let ts = now_millis();

    let rows: Vec<(i64, i64, i64)> = self
      .conn
      .call(move |conn| {
        if let Some(user) = participant {
          // Materialise the requester's undecided votes before counting.
          // Insert-if-absent: recorded answers are never overwritten here.
          conn.execute(
            "INSERT OR IGNORE INTO rsvps \
               (event, participant, slot, attend, timestamp) \
             SELECT ?1, ?2, rowid, 0, ?3 FROM slots WHERE event = ?1",
            rusqlite::params![event, user, ts],
          )?;
        }

        let mut stmt = conn.prepare(
          "SELECT slot, attend, COUNT(DISTINCT participant) \
           FROM rsvps WHERE event = ?1 \
           GROUP BY slot, attend",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![event], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut summary = RsvpSummary::new();
    for (slot, attend, count) in rows {
      summary.entry(slot).or_default().insert(attend, count);
    }
    Ok(summary)
  }

  async fn collect_rsvps(&self, event: i64, requester: i64) -> Result<RsvpDetail> {
    debug!(event, requester, "collect_rsvps");

    let rows: Vec<(i64, i64, i64)> = self
      .conn
      .call(move |conn| {
        let organizer: Option<i64> = conn
          .query_row(
            "SELECT organizer FROM participants WHERE rowid = ?1",
            rusqlite::params![requester],
            |row| row.get(0),
          )
          .optional()?;

        // Fail closed and silent: non-organizers (and unknown requesters)
        // see an empty result, not an error.
        if organizer.unwrap_or(0) == 0 {
          return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(
          "SELECT slot, participant, attend FROM rsvps WHERE event = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![event], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut detail = RsvpDetail::new();
    for (slot, participant, attend) in rows {
      detail
        .entry(slot)
        .or_default()
        .insert(participant, Attend::from_value(attend)?);
    }
    Ok(detail)
  }

  // ── Key/value ─────────────────────────────────────────────────────────────

  async fn get_value(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM key_value WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(value)
  }

  async fn set_value(&self, key: &str, value: &str) -> Result<()> {
    let key = key.to_owned();
    let value = value.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO key_value (key, value) VALUES (?1, ?2) \
           ON CONFLICT (key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

//! SQL schema for the Muster SQLite store.
//!
//! Executed at connection startup; redundant invocation is harmless.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS venues (
    name    TEXT UNIQUE,
    address TEXT
);
CREATE INDEX IF NOT EXISTS venues_name_idx ON venues(name);

CREATE TABLE IF NOT EXISTS events (
    name        TEXT UNIQUE,
    description TEXT NOT NULL,
    venue       INT NOT NULL,
    date_time   INT              -- NULL open, -1 closed no winner, else slot id
);
CREATE INDEX IF NOT EXISTS events_name_idx  ON events(name);
CREATE INDEX IF NOT EXISTS events_venue_idx ON events(venue);

CREATE TABLE IF NOT EXISTS participants (
    name      TEXT NOT NULL UNIQUE,
    section   TEXT,
    organizer INT DEFAULT 0,
    editor    INT DEFAULT 0,     -- 0 none, -1 any event, >0 venue-scoped
    email     TEXT
);
CREATE INDEX IF NOT EXISTS participants_name_idx ON participants(name);

-- Controlled vocabulary for participant sections, lowercase.
CREATE TABLE IF NOT EXISTS sections (
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS slots (
    event    INT,
    yyyymmdd TEXT,
    hhmm     TEXT,
    duration TEXT
);
CREATE INDEX IF NOT EXISTS slots_event_idx ON slots(event);

CREATE TABLE IF NOT EXISTS nevers (
    participant INT,
    yyyymmdd    TEXT,
    UNIQUE(participant, yyyymmdd)
);
CREATE INDEX IF NOT EXISTS nevers_date_idx ON nevers(yyyymmdd);

-- RSVP rows are never deleted, only superseded through the
-- (event, participant, slot) key.
CREATE TABLE IF NOT EXISTS rsvps (
    event       INT NOT NULL,
    participant INT NOT NULL,
    slot        INT NOT NULL,
    attend      INT DEFAULT 0,
    timestamp   INT NOT NULL,    -- advisory; insertion order resolves races
    UNIQUE(event, participant, slot)
);
CREATE INDEX IF NOT EXISTS rsvps_event_idx       ON rsvps(event);
CREATE INDEX IF NOT EXISTS rsvps_participant_idx ON rsvps(participant);

CREATE TABLE IF NOT EXISTS key_value (
    key   TEXT UNIQUE,
    value TEXT
);
CREATE INDEX IF NOT EXISTS key_value_key_idx ON key_value(key);

PRAGMA user_version = 1;
";

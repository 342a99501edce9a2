//! Event read model and config-driven import shapes.

use serde::{Deserialize, Serialize};

use crate::{slot::SlotRsvp, Error, Result};

/// The assembled read model for one event, as returned by `get_event`.
///
/// `chosen` carries the winning slot when the event has been closed with a
/// winner. An open event and one closed with no winner both present as
/// `None` here; the two are externally indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id:          i64,
  pub name:        String,
  pub description: String,
  pub venue:       i64,
  /// Whether the requesting participant may edit the description.
  /// Always `false` on anonymous reads.
  pub editable:    bool,
  pub chosen:      Option<SlotRsvp>,
  pub slots:       Vec<SlotRsvp>,
}

/// One candidate time inside an [`EventConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
  pub yyyymmdd: String,
  pub hhmm:     String,
  pub duration: String,
}

/// The JSON shape accepted for config-driven event creation:
///
/// ```json
/// {
///   "name": "Extravaganza",
///   "venue": 37,
///   "description": "# Best Event\nRSVP or ....",
///   "slots": [
///     { "yyyymmdd": "2018-12-01", "hhmm": "8:39", "duration": "45m" },
///     { "yyyymmdd": "2018-12-01", "hhmm": "9:06", "duration": "45m" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
  pub name:        String,
  pub venue:       i64,
  pub description: String,
  #[serde(default)]
  pub slots:       Vec<SlotConfig>,
  /// Index into `slots` to immediately close the event on.
  #[serde(default)]
  pub chosen:      Option<usize>,
}

impl EventConfig {
  /// Parse a JSON event description, surfacing malformed input as a
  /// validation error rather than a storage fault.
  pub fn from_json(raw: &str) -> Result<Self> {
    serde_json::from_str(raw.trim()).map_err(|e| Error::Config(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_event_config() {
    let config = EventConfig::from_json(
      r#"{
        "name": "Extravaganza",
        "venue": 37,
        "description": "be there",
        "slots": [
          { "yyyymmdd": "2018-12-01", "hhmm": "8:39", "duration": "45m" }
        ]
      }"#,
    )
    .unwrap();
    assert_eq!(config.name, "Extravaganza");
    assert_eq!(config.venue, 37);
    assert_eq!(config.slots.len(), 1);
    assert_eq!(config.chosen, None);
  }

  #[test]
  fn config_slots_default_to_empty() {
    let config = EventConfig::from_json(
      r#"{ "name": "n", "venue": 1, "description": "d" }"#,
    )
    .unwrap();
    assert!(config.slots.is_empty());
  }

  #[test]
  fn rejects_malformed_config() {
    assert!(matches!(
      EventConfig::from_json("not json"),
      Err(Error::Config(_))
    ));
    assert!(matches!(
      EventConfig::from_json(r#"{ "venue": 1 }"#),
      Err(Error::Config(_))
    ));
  }
}

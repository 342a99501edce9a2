//! Pure format validators for the date, time, and duration strings the
//! engine accepts.
//!
//! Validation happens where slots and date-scoped queries are constructed,
//! never deferred to storage constraints, and never coerces: a malformed
//! value is an error, not a best-effort parse.

use crate::{Error, Result};

/// Accepts `YYYY{-|/}M{-|/}D` with a four-digit year and one- or two-digit
/// month and day. Both separators must match.
pub fn validate_yyyymmdd(yyyymmdd: &str) -> Result<()> {
  let sep = match yyyymmdd.as_bytes().get(4) {
    Some(b'-') => '-',
    Some(b'/') => '/',
    _ => return Err(Error::InvalidDate(yyyymmdd.to_owned())),
  };

  let mut groups = yyyymmdd.split(sep);
  let valid = matches!(
    (groups.next(), groups.next(), groups.next(), groups.next()),
    (Some(y), Some(m), Some(d), None)
      if digits(y, 4, 4) && digits(m, 1, 2) && digits(d, 1, 2)
  );

  if valid {
    Ok(())
  } else {
    Err(Error::InvalidDate(yyyymmdd.to_owned()))
  }
}

/// The stricter variant used for date-scoped queries: only `-` separators,
/// which may be omitted entirely (`20221231`). Returns the dash-canonical
/// form so comparisons against stored dates are stable.
pub fn canonical_yyyymmdd(yyyymmdd: &str) -> Result<String> {
  let err = || Error::InvalidDate(yyyymmdd.to_owned());

  if yyyymmdd.contains('-') {
    let mut groups = yyyymmdd.split('-');
    match (groups.next(), groups.next(), groups.next(), groups.next()) {
      (Some(y), Some(m), Some(d), None)
        if digits(y, 4, 4) && digits(m, 1, 2) && digits(d, 1, 2) => {
        Ok(format!("{y}-{m}-{d}"))
      }
      _ => Err(err()),
    }
  } else {
    // Without separators only the fixed-width form is unambiguous.
    if !digits(yyyymmdd, 8, 8) {
      return Err(err());
    }
    let (y, md) = yyyymmdd.split_at(4);
    let (m, d) = md.split_at(2);
    Ok(format!("{y}-{m}-{d}"))
  }
}

/// Accepts `H:MM` or `HH:MM`.
pub fn validate_hhmm(hhmm: &str) -> Result<()> {
  let valid = match hhmm.split_once(':') {
    Some((h, m)) => digits(h, 1, 2) && digits(m, 2, 2),
    None => false,
  };

  if valid {
    Ok(())
  } else {
    Err(Error::InvalidTime(hhmm.to_owned()))
  }
}

/// Accepts a whole number of minutes with a literal `m` suffix (`90m`).
/// No other unit is recognised.
pub fn validate_duration(duration: &str) -> Result<()> {
  let valid = match duration.strip_suffix('m') {
    Some(minutes) => digits(minutes, 1, usize::MAX),
    None => false,
  };

  if valid {
    Ok(())
  } else {
    Err(Error::InvalidDuration(duration.to_owned()))
  }
}

fn digits(s: &str, min: usize, max: usize) -> bool {
  (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_dashed_and_slashed_dates() {
    validate_yyyymmdd("2018/12/01").unwrap();
    validate_yyyymmdd("2018-12-01").unwrap();
    validate_yyyymmdd("2018-12-1").unwrap();
    validate_yyyymmdd("2018-2-01").unwrap();
  }

  #[test]
  fn rejects_malformed_dates() {
    assert!(validate_yyyymmdd("").is_err());
    assert!(validate_yyyymmdd("201-12-01").is_err());
    assert!(validate_yyyymmdd("Christmas").is_err());
    assert!(validate_yyyymmdd("2018-12").is_err());
    assert!(validate_yyyymmdd("2018-12-01-07").is_err());
  }

  #[test]
  fn canonicalizes_dates() {
    assert_eq!(canonical_yyyymmdd("2022-05-23").unwrap(), "2022-05-23");
    assert_eq!(canonical_yyyymmdd("2022-5-3").unwrap(), "2022-5-3");
    assert_eq!(canonical_yyyymmdd("20220523").unwrap(), "2022-05-23");
    assert!(canonical_yyyymmdd("2022/05/23").is_err());
    assert!(canonical_yyyymmdd("2022053").is_err());
    assert!(canonical_yyyymmdd("today").is_err());
  }

  #[test]
  fn validates_times() {
    validate_hhmm("12:00").unwrap();
    validate_hhmm("1:59").unwrap();
    validate_hhmm("23:59").unwrap();
    assert!(validate_hhmm("").is_err());
    assert!(validate_hhmm("11:00 am").is_err());
    assert!(validate_hhmm("12pm").is_err());
    assert!(validate_hhmm("12").is_err());
    assert!(validate_hhmm("noon").is_err());
  }

  #[test]
  fn validates_durations() {
    validate_duration("30m").unwrap();
    validate_duration("5m").unwrap();
    assert!(validate_duration("").is_err());
    assert!(validate_duration("1 sec").is_err());
    assert!(validate_duration("90s").is_err());
    assert!(validate_duration("90 m").is_err());
    assert!(validate_duration("m").is_err());
  }
}

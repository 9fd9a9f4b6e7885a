//! Clinic wall-clock time and the free-form date strings the model sends.
//!
//! Appointments are stored in clinic local time. A timestamp carrying an
//! explicit offset is converted to the clinic's offset before its hour is
//! read; one without an offset is already clinic time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use thiserror::Error;

const NAIVE_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date or time string the clock could not read. The text is handed to
/// the model verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not understand the date '{0}'. Please use the format YYYY-MM-DDTHH:MM.")]
pub struct UnreadableDate(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicClock {
  utc_offset: FixedOffset,
}

impl Default for ClinicClock {
  fn default() -> Self { Self::utc() }
}

impl ClinicClock {
  pub fn new(utc_offset: FixedOffset) -> Self { Self { utc_offset } }

  pub fn utc() -> Self {
    Self {
      utc_offset: Utc.fix(),
    }
  }

  /// `None` when the offset is a day or more away from UTC.
  pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
    FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
  }

  pub fn utc_offset(&self) -> FixedOffset { self.utc_offset }

  /// Current clinic wall-clock time.
  pub fn now(&self) -> NaiveDateTime {
    Utc::now().with_timezone(&self.utc_offset).naive_local()
  }

  /// Read an appointment start time.
  pub fn parse_date_time(&self, input: &str) -> Result<NaiveDateTime, UnreadableDate> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
      return Ok(dt.with_timezone(&self.utc_offset).naive_local());
    }
    NAIVE_FORMATS
      .iter()
      .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
      .ok_or_else(|| UnreadableDate(trimmed.to_owned()))
  }

  /// Read a day. A full timestamp is accepted and only its date is kept.
  pub fn parse_date(&self, input: &str) -> Result<NaiveDate, UnreadableDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
      .or_else(|_| self.parse_date_time(trimmed).map(|at| at.date()))
      .map_err(|_| UnreadableDate(trimmed.to_owned()))
  }
}

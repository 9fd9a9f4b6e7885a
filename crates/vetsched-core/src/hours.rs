//! Business hours: the static part of the booking policy.
//!
//! Checking a candidate against the operating window needs no store access.
//! Whether the slot is already taken is a separate question answered by
//! [`crate::slots`] and, at write time, by the store.

use std::{ops::Range, str::FromStr};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
  appointment::DEFAULT_DURATION_MINUTES,
  error::{Error, Rejection, Result},
};

/// The clinic's weekly operating policy.
///
/// The operating window is closed-open: with the defaults, 09:00 is the
/// first bookable start and 17:00 the last. Exactly one weekday is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
  open_hour:  u32,
  close_hour: u32,
  closed_day: Weekday,
}

impl Default for BusinessHours {
  fn default() -> Self {
    Self {
      open_hour:  9,
      close_hour: 18,
      closed_day: Weekday::Sun,
    }
  }
}

impl BusinessHours {
  pub fn new(open_hour: u32, close_hour: u32, closed_day: Weekday) -> Result<Self> {
    if open_hour >= close_hour || close_hour > 24 {
      return Err(Error::InvalidHours {
        open:  open_hour,
        close: close_hour,
      });
    }
    Ok(Self {
      open_hour,
      close_hour,
      closed_day,
    })
  }

  pub fn open_hour(&self) -> u32 { self.open_hour }

  pub fn close_hour(&self) -> u32 { self.close_hour }

  pub fn closed_day(&self) -> Weekday { self.closed_day }

  pub fn is_closed_on(&self, date: NaiveDate) -> bool {
    date.weekday() == self.closed_day
  }

  /// Start hours of every bookable slot in a day, ascending.
  pub fn slot_hours(&self) -> Range<u32> { self.open_hour..self.close_hour }

  /// Decide whether `candidate` may be booked as far as day and hour go.
  ///
  /// Acceptance says nothing about conflicts with existing bookings.
  pub fn validate_slot(&self, candidate: NaiveDateTime) -> Result<(), Rejection> {
    if self.is_closed_on(candidate.date()) {
      return Err(Rejection::ClosedDay(self.closed_day));
    }
    let hour = candidate.hour();
    if !self.slot_hours().contains(&hour) {
      return Err(Rejection::OutsideHours {
        hour,
        open: self.open_hour,
        close: self.close_hour,
      });
    }
    Ok(())
  }

  /// Only fixed one-hour appointments fit the hourly slot model.
  pub fn validate_duration(&self, minutes: u32) -> Result<(), Rejection> {
    if minutes != DEFAULT_DURATION_MINUTES {
      return Err(Rejection::UnsupportedDuration {
        minutes,
        supported: DEFAULT_DURATION_MINUTES,
      });
    }
    Ok(())
  }
}

/// Render a slot start hour the way callers display it, e.g. `9:00`.
pub fn format_slot(hour: u32) -> String { format!("{hour}:00") }

/// Parse a weekday from configuration text (`"sunday"`, `"Sun"`, ...).
pub fn parse_weekday(s: &str) -> Result<Weekday> {
  Weekday::from_str(s.trim()).map_err(|_| Error::UnknownWeekday(s.to_owned()))
}

#[cfg(test)]
mod tests {
  use chrono::NaiveTime;
  use proptest::prelude::*;

  use super::*;

  fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
  }

  // 2024-05-12 is a Sunday.
  fn sunday() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 12).unwrap() }

  // Monday 2024-05-13 through Saturday 2024-05-18.
  fn open_day(offset: u64) -> NaiveDate {
    sunday() + chrono::Days::new(1 + offset % 6)
  }

  #[test]
  fn boundaries_are_closed_open() {
    let hours = BusinessHours::default();
    let tuesday = open_day(1);
    assert!(hours.validate_slot(at(tuesday, 9, 0)).is_ok());
    assert!(hours.validate_slot(at(tuesday, 17, 59)).is_ok());
    assert_eq!(
      hours.validate_slot(at(tuesday, 18, 0)),
      Err(Rejection::OutsideHours { hour: 18, open: 9, close: 18 })
    );
    assert_eq!(
      hours.validate_slot(at(tuesday, 8, 59)),
      Err(Rejection::OutsideHours { hour: 8, open: 9, close: 18 })
    );
  }

  #[test]
  fn default_day_has_nine_slots() {
    let hours: Vec<u32> = BusinessHours::default().slot_hours().collect();
    assert_eq!(hours, vec![9, 10, 11, 12, 13, 14, 15, 16, 17]);
  }

  #[test]
  fn rejects_inverted_window() {
    assert!(BusinessHours::new(18, 9, Weekday::Sun).is_err());
    assert!(BusinessHours::new(9, 9, Weekday::Sun).is_err());
    assert!(BusinessHours::new(8, 25, Weekday::Sun).is_err());
    assert!(BusinessHours::new(8, 20, Weekday::Mon).is_ok());
  }

  #[test]
  fn only_one_hour_appointments() {
    let hours = BusinessHours::default();
    assert!(hours.validate_duration(60).is_ok());
    assert!(matches!(
      hours.validate_duration(30),
      Err(Rejection::UnsupportedDuration { minutes: 30, .. })
    ));
  }

  #[test]
  fn parses_weekday_names() {
    assert_eq!(parse_weekday("sunday").unwrap(), Weekday::Sun);
    assert_eq!(parse_weekday("Mon").unwrap(), Weekday::Mon);
    assert!(parse_weekday("someday").is_err());
  }

  proptest! {
    #[test]
    fn closed_day_rejected_at_every_hour(hour in 0u32..24, minute in 0u32..60) {
      let hours = BusinessHours::default();
      prop_assert_eq!(
        hours.validate_slot(at(sunday(), hour, minute)),
        Err(Rejection::ClosedDay(Weekday::Sun))
      );
    }

    #[test]
    fn out_of_hours_rejection_carries_hour(
      day in 0u64..6,
      hour in prop_oneof![0u32..9, 18u32..24],
    ) {
      let hours = BusinessHours::default();
      let result = hours.validate_slot(at(open_day(day), hour, 0));
      prop_assert_eq!(
        result.clone(),
        Err(Rejection::OutsideHours { hour, open: 9, close: 18 })
      );
      let message = result.unwrap_err().to_string();
      let expected = format!("{hour}:00");
      prop_assert!(message.contains(&expected));
    }

    #[test]
    fn open_hours_on_open_days_accepted(
      day in 0u64..6,
      hour in 9u32..18,
      minute in 0u32..60,
    ) {
      let hours = BusinessHours::default();
      prop_assert!(hours.validate_slot(at(open_day(day), hour, minute)).is_ok());
    }
  }
}

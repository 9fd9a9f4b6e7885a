//! Slot enumeration: which hour slots of a day are still free.
//!
//! Every appointment lasts exactly one hour and starts on the hour it is
//! booked in, so a day is a small fixed set of hourly slots and availability
//! is plain set subtraction. Variable durations would need interval overlap
//! checks instead.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
  appointment::Appointment,
  hours::{BusinessHours, format_slot},
};

/// Free slots for one day, ascending by hour. Never empty: a day with no
/// free slot is reported as [`Rejection::FullyBooked`](crate::Rejection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlots {
  pub date:  NaiveDate,
  pub hours: Vec<u32>,
}

impl AvailableSlots {
  /// Slots rendered as `"H:00"`.
  pub fn labels(&self) -> Vec<String> {
    self.hours.iter().copied().map(format_slot).collect()
  }

  /// One-line human-readable summary.
  pub fn describe(&self) -> String {
    format!(
      "Available times on {}: {}.",
      self.date.format("%Y-%m-%d"),
      self.labels().join(", ")
    )
  }
}

/// First and last instant of `day`, both inclusive.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
  let start = day.and_time(NaiveTime::MIN);
  let end = day.and_time(
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
  );
  (start, end)
}

/// The operating slots of `day` not held by any non-cancelled booking.
///
/// Bookings on other days are ignored, so callers may pass a superset.
pub fn open_slots(
  hours: &BusinessHours,
  day: NaiveDate,
  bookings: &[Appointment],
) -> Vec<u32> {
  let taken: BTreeSet<u32> = bookings
    .iter()
    .filter(|a| a.status.occupies_slot() && a.slot_date() == day)
    .map(Appointment::slot_hour)
    .collect();

  hours.slot_hours().filter(|h| !taken.contains(h)).collect()
}

//! Error types for `vetsched-core`.
//!
//! Two families live here:
//!
//! - [`Rejection`]: an expected business-rule outcome (closed day, finalized
//!   appointment, unknown pet). Its `Display` text is shown to the end user
//!   or handed back to the language model unmodified.
//! - [`SchedulingError`]: what the engine returns from every operation —
//!   either a [`Rejection`] or a failure of the backing store.

use chrono::{NaiveDate, Weekday};
use thiserror::Error;
use uuid::Uuid;

use crate::appointment::AppointmentStatus;

/// Shown to callers whenever the store fails, on reads and writes alike.
/// The engine never retries.
pub const STORE_FAILURE_MESSAGE: &str =
  "Could not reach the clinic records. Please try again.";

/// Misconfiguration of the engine itself.
#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "invalid operating window: opening hour {open} must be before closing \
     hour {close}, and closing hour must be at most 24"
  )]
  InvalidHours { open: u32, close: u32 },

  #[error("unknown weekday: {0:?}")]
  UnknownWeekday(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Rejections ──────────────────────────────────────────────────────────────

/// A business-rule refusal. These are ordinary values, never faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
  #[error(
    "Cannot schedule on {}: the clinic is closed on this day.",
    weekday_name(.0)
  )]
  ClosedDay(Weekday),

  #[error(
    "Cannot schedule at {hour}:00: outside operating hours \
     ({open}:00 to {close}:00)."
  )]
  OutsideHours { hour: u32, open: u32, close: u32 },

  #[error("Only {supported}-minute appointments can be scheduled (got {minutes}).")]
  UnsupportedDuration { minutes: u32, supported: u32 },

  #[error("No available slots on {0}: the day is fully booked.")]
  FullyBooked(NaiveDate),

  #[error("The {hour}:00 slot on {date} is already booked.")]
  SlotTaken { date: NaiveDate, hour: u32 },

  #[error("Appointment {id} is already finalized ({status}).")]
  AlreadyFinalized { id: Uuid, status: AppointmentStatus },

  #[error(
    "Appointment {id} can only be edited while scheduled (current status: \
     {status})."
  )]
  NotEditable { id: Uuid, status: AppointmentStatus },

  #[error("Appointment {id} cannot move from {from} to {to}.")]
  InvalidTransition {
    id:   Uuid,
    from: AppointmentStatus,
    to:   AppointmentStatus,
  },

  #[error(
    "Exam results can only be added to completed exam appointments."
  )]
  ExamResultNotAllowed,

  #[error("Invalid exam result: {0}")]
  InvalidExamResult(String),

  #[error("Appointment {0} not found.")]
  AppointmentNotFound(Uuid),

  #[error("Pet {0} not found.")]
  UnknownPet(Uuid),

  #[error("Pet {pet_id} does not belong to client {client_id}.")]
  PetOwnerMismatch { pet_id: Uuid, client_id: Uuid },

  #[error("No pet named '{0}' was found.")]
  PetNotFound(String),

  #[error(
    "{count} pets are named '{name}'. Please tell me which one you mean \
     (for example by including the owner's name)."
  )]
  AmbiguousPet { name: String, count: usize },
}

/// Full English weekday name, e.g. `Sunday`.
pub fn weekday_name(day: &Weekday) -> &'static str {
  match day {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

// ─── Engine errors ───────────────────────────────────────────────────────────

/// The error type of every [`Scheduler`](crate::scheduler::Scheduler)
/// operation, generic over the store's own error.
#[derive(Debug, Error)]
pub enum SchedulingError<E> {
  #[error(transparent)]
  Rejected(#[from] Rejection),

  #[error("store error: {0}")]
  Store(#[source] E),
}

impl<E> SchedulingError<E> {
  /// The rejection, if this is a business-rule outcome.
  pub fn rejection(&self) -> Option<&Rejection> {
    match self {
      Self::Rejected(r) => Some(r),
      Self::Store(_) => None,
    }
  }

  pub fn is_store_failure(&self) -> bool { matches!(self, Self::Store(_)) }

  /// Text to render to the end user: the rejection reason verbatim, or the
  /// generic retry message for store failures.
  pub fn user_message(&self) -> String {
    match self {
      Self::Rejected(r) => r.to_string(),
      Self::Store(_) => STORE_FAILURE_MESSAGE.to_owned(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn closed_day_message_names_the_day() {
    let msg = Rejection::ClosedDay(Weekday::Sun).to_string();
    assert_eq!(
      msg,
      "Cannot schedule on Sunday: the clinic is closed on this day."
    );
  }

  #[test]
  fn outside_hours_message_includes_hour() {
    let msg = Rejection::OutsideHours { hour: 19, open: 9, close: 18 }
      .to_string();
    assert!(msg.contains("19:00"));
    assert!(msg.contains("outside operating hours"));
  }

  #[test]
  fn store_failure_renders_generic_message() {
    let err: SchedulingError<std::io::Error> =
      SchedulingError::Store(std::io::Error::other("disk full"));
    assert_eq!(
      err.user_message(),
      "Could not reach the clinic records. Please try again."
    );
    assert!(err.rejection().is_none());
  }
}

//! Appointment types and the status state machine.
//!
//! `scheduled_at` is a naive timestamp in clinic wall-clock time. Audit
//! timestamps (`created_at`, `updated_at`) are UTC and always set by the
//! store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Length of every appointment today. Kept as a field on the appointment so
/// that variable durations can be introduced without a schema change.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// What the appointment is for.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppointmentKind {
  Consultation,
  Vaccination,
  Surgery,
  Exam,
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of an appointment.
///
/// ```text
/// Scheduled ──► Confirmed ──► Completed
///     │             │
///     ├─────────────┴───────► Cancelled
///     └─────────────────────► Completed
/// ```
///
/// `Cancelled` and `Completed` are terminal.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppointmentStatus {
  #[default]
  Scheduled,
  Confirmed,
  Cancelled,
  Completed,
}

impl AppointmentStatus {
  /// `Cancelled` and `Completed` admit no further changes.
  pub fn is_final(self) -> bool {
    matches!(self, Self::Cancelled | Self::Completed)
  }

  /// Whether an appointment in this status holds its hour slot.
  pub fn occupies_slot(self) -> bool { !matches!(self, Self::Cancelled) }

  pub fn can_transition_to(self, next: Self) -> bool {
    use AppointmentStatus::*;
    matches!(
      (self, next),
      (Scheduled, Confirmed | Cancelled | Completed)
        | (Confirmed, Cancelled | Completed)
    )
  }
}

// ─── Appointment ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
  pub appointment_id:   Uuid,
  pub client_id:        Uuid,
  pub pet_id:           Uuid,
  pub scheduled_at:     NaiveDateTime,
  pub duration_minutes: u32,
  pub kind:             AppointmentKind,
  pub status:           AppointmentStatus,
  pub notes:            Option<String>,
  /// Set once an exam result has been attached.
  pub has_result:       bool,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl Appointment {
  pub fn slot_date(&self) -> NaiveDate { self.scheduled_at.date() }

  /// The hour slot this appointment occupies.
  pub fn slot_hour(&self) -> u32 { self.scheduled_at.hour() }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ClinicStore::insert_appointment`].
///
/// The store assigns the id and audit timestamps. New appointments always
/// start out [`AppointmentStatus::Scheduled`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
  pub client_id:        Uuid,
  pub pet_id:           Uuid,
  pub scheduled_at:     NaiveDateTime,
  #[serde(default = "default_duration")]
  pub duration_minutes: u32,
  pub kind:             AppointmentKind,
  #[serde(default)]
  pub notes:            Option<String>,
}

fn default_duration() -> u32 { DEFAULT_DURATION_MINUTES }

impl NewAppointment {
  pub fn new(
    client_id: Uuid,
    pet_id: Uuid,
    scheduled_at: NaiveDateTime,
    kind: AppointmentKind,
  ) -> Self {
    Self {
      client_id,
      pet_id,
      scheduled_at,
      duration_minutes: DEFAULT_DURATION_MINUTES,
      kind,
      notes: None,
    }
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }
}

/// Fields an edit may change. `None` leaves the field untouched; `notes`
/// uses a nested option so that notes can be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatch {
  pub client_id:    Option<Uuid>,
  pub pet_id:       Option<Uuid>,
  pub scheduled_at: Option<NaiveDateTime>,
  pub kind:         Option<AppointmentKind>,
  #[serde(default, with = "double_option")]
  pub notes:        Option<Option<String>>,
}

impl AppointmentPatch {
  pub fn is_empty(&self) -> bool { self == &Self::default() }

  /// Apply the patch to an in-memory copy; used by stores that keep whole
  /// records.
  pub fn apply_to(&self, appointment: &mut Appointment) {
    if let Some(client_id) = self.client_id {
      appointment.client_id = client_id;
    }
    if let Some(pet_id) = self.pet_id {
      appointment.pet_id = pet_id;
    }
    if let Some(at) = self.scheduled_at {
      appointment.scheduled_at = at;
    }
    if let Some(kind) = self.kind {
      appointment.kind = kind;
    }
    if let Some(notes) = &self.notes {
      appointment.notes = notes.clone();
    }
  }
}

/// Distinguishes an absent `notes` key from an explicit `null`.
mod double_option {
  use serde::{Deserialize, Deserializer, Serialize, Serializer};

  pub fn serialize<S: Serializer>(
    value: &Option<Option<String>>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match value {
      Some(inner) => inner.serialize(serializer),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
  }
}

//! The `ClinicStore` trait: the persistence capability the scheduling engine
//! is handed at construction time.
//!
//! The trait is implemented by storage backends (e.g. `vetsched-store-sqlite`
//! and the in-memory [`MemoryStore`](crate::memory::MemoryStore)). The engine
//! never reaches a database on its own.

use std::future::Future;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
  appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment},
  exam::{ExamResult, NewExamResult},
  patient::{Client, NewClient, NewPet, Pet},
};

/// Errors raised by a store backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when a write was refused because another non-cancelled
  /// appointment already holds the same day and hour.
  fn is_slot_taken(&self) -> bool { false }
}

/// Abstraction over a clinic store backend.
///
/// Writes that place an appointment in a slot (`insert_appointment`, and
/// `update_appointment` / `set_status` when they move or revive a booking)
/// must be refused with an error for which [`StoreError::is_slot_taken`]
/// holds if another non-cancelled appointment occupies the same day and
/// hour. This closes the gap between listing free slots and booking one.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ClinicStore: Send + Sync {
  type Error: StoreError;

  // ── Appointments ──────────────────────────────────────────────────────

  /// Persist a new appointment with status
  /// [`Scheduled`](AppointmentStatus::Scheduled). The store assigns the id
  /// and audit timestamps.
  fn insert_appointment(
    &self,
    input: NewAppointment,
  ) -> impl Future<Output = Result<Appointment, Self::Error>> + Send + '_;

  /// Retrieve an appointment by id. Returns `None` if not found.
  fn get_appointment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Appointment>, Self::Error>> + Send + '_;

  /// All appointments, ordered by `scheduled_at`.
  fn list_appointments(
    &self,
  ) -> impl Future<Output = Result<Vec<Appointment>, Self::Error>> + Send + '_;

  /// Appointments of any status with `from <= scheduled_at <= to`, ordered
  /// by `scheduled_at`.
  fn find_appointments(
    &self,
    from: NaiveDateTime,
    to: NaiveDateTime,
  ) -> impl Future<Output = Result<Vec<Appointment>, Self::Error>> + Send + '_;

  /// Apply `patch` and bump `updated_at`. Returns `None` if not found.
  fn update_appointment(
    &self,
    id: Uuid,
    patch: AppointmentPatch,
  ) -> impl Future<Output = Result<Option<Appointment>, Self::Error>> + Send + '_;

  /// Overwrite the status and bump `updated_at`. Returns `None` if not
  /// found. Transition rules are the engine's business, not the store's.
  fn set_status(
    &self,
    id: Uuid,
    status: AppointmentStatus,
  ) -> impl Future<Output = Result<Option<Appointment>, Self::Error>> + Send + '_;

  // ── Clients & pets ────────────────────────────────────────────────────

  fn add_client(
    &self,
    input: NewClient,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  fn list_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  fn add_pet(
    &self,
    input: NewPet,
  ) -> impl Future<Output = Result<Pet, Self::Error>> + Send + '_;

  /// Retrieve a pet by id. Returns `None` if not found.
  fn get_pet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Pet>, Self::Error>> + Send + '_;

  /// Pets whose name equals `name`, ignoring case and surrounding
  /// whitespace. Ordered by creation time.
  fn find_pets_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<Pet>, Self::Error>> + Send + 'a;

  // ── Exam results ──────────────────────────────────────────────────────

  /// Record an exam result for an appointment and set the appointment's
  /// `has_result` flag in the same write. Pet and client are copied from
  /// the appointment. Returns `None` if the appointment does not exist.
  fn insert_exam_result(
    &self,
    appointment_id: Uuid,
    input: NewExamResult,
  ) -> impl Future<Output = Result<Option<ExamResult>, Self::Error>> + Send + '_;

  /// Exam results, optionally restricted to one appointment, newest first.
  fn list_exam_results(
    &self,
    appointment_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<ExamResult>, Self::Error>> + Send + '_;
}

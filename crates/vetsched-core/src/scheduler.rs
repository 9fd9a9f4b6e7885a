//! [`Scheduler`] — the booking engine.
//!
//! Composes the static business-hours policy with reads and writes against
//! an injected [`ClinicStore`]. Every operation is a short, independent
//! sequence of store calls; the only side-effecting call is the last one.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset as _, Timelike, Utc};
use uuid::Uuid;

use crate::{
  appointment::{
    Appointment, AppointmentKind, AppointmentPatch, AppointmentStatus, NewAppointment,
  },
  error::{Rejection, SchedulingError},
  exam::{ExamResult, NewExamResult},
  hours::BusinessHours,
  patient::Pet,
  slots::{AvailableSlots, day_bounds, open_slots},
  store::{ClinicStore, StoreError},
};

/// Result of a [`Scheduler`] operation over store `S`.
pub type Outcome<T, S> = Result<T, SchedulingError<<S as ClinicStore>::Error>>;

/// The scheduling engine.
///
/// Cloning is cheap — the store is reference-counted.
pub struct Scheduler<S> {
  store:      Arc<S>,
  hours:      BusinessHours,
  utc_offset: FixedOffset,
}

impl<S> Clone for Scheduler<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      hours:      self.hours,
      utc_offset: self.utc_offset,
    }
  }
}

impl<S: ClinicStore> Scheduler<S> {
  /// A scheduler whose clinic calendar runs on UTC.
  pub fn new(store: Arc<S>, hours: BusinessHours) -> Self {
    Self {
      store,
      hours,
      utc_offset: Utc.fix(),
    }
  }

  /// Use the clinic's UTC offset when deciding what "today" is.
  pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
    self.utc_offset = utc_offset;
    self
  }

  pub fn hours(&self) -> &BusinessHours { &self.hours }

  /// The clinic's current calendar date.
  pub fn today(&self) -> NaiveDate {
    Utc::now().with_timezone(&self.utc_offset).date_naive()
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Policy ────────────────────────────────────────────────────────────

  /// Day and hour check only; does not consult existing bookings.
  pub fn validate_slot(&self, candidate: NaiveDateTime) -> Result<(), Rejection> {
    self.hours.validate_slot(candidate)
  }

  /// Free hour slots on `day`. A closed day is rejected without touching
  /// the store; a day with no free slot is rejected as fully booked.
  pub async fn list_available_slots(&self, day: NaiveDate) -> Outcome<AvailableSlots, S> {
    if self.hours.is_closed_on(day) {
      return Err(self.reject(Rejection::ClosedDay(self.hours.closed_day())));
    }

    let (start, end) = day_bounds(day);
    let bookings = self
      .store
      .find_appointments(start, end)
      .await
      .map_err(|e| self.store_failure("find_appointments", e))?;

    let hours = open_slots(&self.hours, day, &bookings);
    if hours.is_empty() {
      return Err(self.reject(Rejection::FullyBooked(day)));
    }
    Ok(AvailableSlots { date: day, hours })
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get(&self, id: Uuid) -> Outcome<Appointment, S> {
    self
      .store
      .get_appointment(id)
      .await
      .map_err(|e| self.store_failure("get_appointment", e))?
      .ok_or_else(|| self.reject(Rejection::AppointmentNotFound(id)))
  }

  pub async fn list(&self) -> Outcome<Vec<Appointment>, S> {
    self
      .store
      .list_appointments()
      .await
      .map_err(|e| self.store_failure("list_appointments", e))
  }

  pub async fn exam_results(
    &self,
    appointment_id: Option<Uuid>,
  ) -> Outcome<Vec<ExamResult>, S> {
    if let Some(id) = appointment_id {
      self.get(id).await?;
    }
    self
      .store
      .list_exam_results(appointment_id)
      .await
      .map_err(|e| self.store_failure("list_exam_results", e))
  }

  /// Resolve a free-text pet name to exactly one pet. Several matches are
  /// rejected rather than guessed.
  pub async fn find_pet_by_name(&self, name: &str) -> Outcome<Pet, S> {
    let mut pets = self
      .store
      .find_pets_by_name(name)
      .await
      .map_err(|e| self.store_failure("find_pets_by_name", e))?;

    match pets.len() {
      0 => Err(self.reject(Rejection::PetNotFound(name.trim().to_owned()))),
      1 => Ok(pets.remove(0)),
      count => Err(self.reject(Rejection::AmbiguousPet {
        name: name.trim().to_owned(),
        count,
      })),
    }
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Book a new appointment in status `Scheduled`.
  pub async fn create(&self, input: NewAppointment) -> Outcome<Appointment, S> {
    self
      .hours
      .validate_slot(input.scheduled_at)
      .and_then(|()| self.hours.validate_duration(input.duration_minutes))
      .map_err(|r| self.reject(r))?;
    self.check_pet_owner(input.pet_id, input.client_id).await?;

    let slot = input.scheduled_at;
    let appointment = self
      .store
      .insert_appointment(input)
      .await
      .map_err(|e| self.write_failure("insert_appointment", slot, e))?;

    tracing::info!(
      appointment_id = %appointment.appointment_id,
      scheduled_at = %appointment.scheduled_at,
      kind = %appointment.kind,
      "appointment created"
    );
    Ok(appointment)
  }

  /// Change date, kind, notes, or pet of an appointment that is still
  /// `Scheduled`.
  pub async fn edit(&self, id: Uuid, patch: AppointmentPatch) -> Outcome<Appointment, S> {
    let current = self.get(id).await?;
    if current.status != AppointmentStatus::Scheduled {
      return Err(self.reject(Rejection::NotEditable {
        id,
        status: current.status,
      }));
    }

    if let Some(at) = patch.scheduled_at
      && at != current.scheduled_at
    {
      self.hours.validate_slot(at).map_err(|r| self.reject(r))?;
    }

    let client_id = patch.client_id.unwrap_or(current.client_id);
    let pet_id = patch.pet_id.unwrap_or(current.pet_id);
    if client_id != current.client_id || pet_id != current.pet_id {
      self.check_pet_owner(pet_id, client_id).await?;
    }

    if patch.is_empty() {
      return Ok(current);
    }

    let slot = patch.scheduled_at.unwrap_or(current.scheduled_at);
    let updated = self
      .store
      .update_appointment(id, patch)
      .await
      .map_err(|e| self.write_failure("update_appointment", slot, e))?
      .ok_or_else(|| self.reject(Rejection::AppointmentNotFound(id)))?;

    tracing::info!(appointment_id = %id, "appointment updated");
    Ok(updated)
  }

  /// Irreversibly cancel an appointment, freeing its slot.
  pub async fn cancel(&self, id: Uuid) -> Outcome<Appointment, S> {
    self.transition(id, AppointmentStatus::Cancelled).await
  }

  pub async fn confirm(&self, id: Uuid) -> Outcome<Appointment, S> {
    self.transition(id, AppointmentStatus::Confirmed).await
  }

  pub async fn complete(&self, id: Uuid) -> Outcome<Appointment, S> {
    self.transition(id, AppointmentStatus::Completed).await
  }

  /// Attach a result to a completed exam appointment. The result date may
  /// not lie after the clinic's current date. This does not change the
  /// appointment's status; it only sets `has_result`.
  pub async fn attach_exam_result(
    &self,
    id: Uuid,
    input: NewExamResult,
  ) -> Outcome<ExamResult, S> {
    let appointment = self.get(id).await?;
    if appointment.status != AppointmentStatus::Completed
      || appointment.kind != AppointmentKind::Exam
    {
      return Err(self.reject(Rejection::ExamResultNotAllowed));
    }
    input.validate(self.today()).map_err(|r| self.reject(r))?;

    let result = self
      .store
      .insert_exam_result(id, input.normalized())
      .await
      .map_err(|e| self.store_failure("insert_exam_result", e))?
      .ok_or_else(|| self.reject(Rejection::AppointmentNotFound(id)))?;

    tracing::info!(
      appointment_id = %id,
      exam_result_id = %result.exam_result_id,
      "exam result attached"
    );
    Ok(result)
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn transition(&self, id: Uuid, to: AppointmentStatus) -> Outcome<Appointment, S> {
    let current = self.get(id).await?;
    if current.status.is_final() {
      return Err(self.reject(Rejection::AlreadyFinalized {
        id,
        status: current.status,
      }));
    }
    if !current.status.can_transition_to(to) {
      return Err(self.reject(Rejection::InvalidTransition {
        id,
        from: current.status,
        to,
      }));
    }

    let updated = self
      .store
      .set_status(id, to)
      .await
      .map_err(|e| self.write_failure("set_status", current.scheduled_at, e))?
      .ok_or_else(|| self.reject(Rejection::AppointmentNotFound(id)))?;

    tracing::info!(appointment_id = %id, from = %current.status, %to, "status changed");
    Ok(updated)
  }

  async fn check_pet_owner(&self, pet_id: Uuid, client_id: Uuid) -> Outcome<(), S> {
    let pet = self
      .store
      .get_pet(pet_id)
      .await
      .map_err(|e| self.store_failure("get_pet", e))?
      .ok_or_else(|| self.reject(Rejection::UnknownPet(pet_id)))?;

    if pet.client_id != client_id {
      return Err(self.reject(Rejection::PetOwnerMismatch { pet_id, client_id }));
    }
    Ok(())
  }

  fn reject(&self, rejection: Rejection) -> SchedulingError<S::Error> {
    tracing::debug!(reason = %rejection, "request rejected");
    SchedulingError::Rejected(rejection)
  }

  fn store_failure(&self, op: &'static str, error: S::Error) -> SchedulingError<S::Error> {
    tracing::error!(op, error = %error, "store failure");
    SchedulingError::Store(error)
  }

  /// Like [`Self::store_failure`], but a uniqueness violation on the slot
  /// becomes a user-facing rejection.
  fn write_failure(
    &self,
    op: &'static str,
    slot: NaiveDateTime,
    error: S::Error,
  ) -> SchedulingError<S::Error> {
    if error.is_slot_taken() {
      return self.reject(Rejection::SlotTaken {
        date: slot.date(),
        hour: slot.hour(),
      });
    }
    self.store_failure(op, error)
  }
}

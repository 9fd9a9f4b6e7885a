//! [`MemoryStore`] — an in-process [`ClinicStore`].
//!
//! Holds everything in a mutex-guarded map. Used by tests across the
//! workspace and handy for demos. It enforces the same slot uniqueness rule
//! as the SQLite backend, counts slot reads, and can be told to fail writes
//! so that store-failure paths can be exercised.

use std::{
  collections::HashMap,
  sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment},
  exam::{ExamResult, NewExamResult},
  patient::{Client, NewClient, NewPet, Pet},
  store::{ClinicStore, StoreError},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("slot {hour}:00 on {date} is already taken")]
  SlotTaken { date: NaiveDate, hour: u32 },

  #[error("client not found: {0}")]
  UnknownClient(Uuid),

  #[error("store unavailable")]
  Unavailable,
}

impl StoreError for MemoryError {
  fn is_slot_taken(&self) -> bool { matches!(self, Self::SlotTaken { .. }) }
}

#[derive(Default)]
struct Inner {
  appointments: HashMap<Uuid, Appointment>,
  clients:      Vec<Client>,
  pets:         Vec<Pet>,
  exam_results: Vec<ExamResult>,
}

impl Inner {
  /// Refuse if a non-cancelled appointment other than `except` holds the
  /// slot of `at`.
  fn check_slot_free(&self, at: NaiveDateTime, except: Option<Uuid>) -> Result<(), MemoryError> {
    let clash = self.appointments.values().any(|a| {
      Some(a.appointment_id) != except
        && a.status.occupies_slot()
        && a.slot_date() == at.date()
        && a.slot_hour() == at.hour()
    });
    if clash {
      return Err(MemoryError::SlotTaken {
        date: at.date(),
        hour: at.hour(),
      });
    }
    Ok(())
  }
}

/// In-memory clinic store.
#[derive(Default)]
pub struct MemoryStore {
  inner:       Mutex<Inner>,
  slot_reads:  AtomicUsize,
  fail_writes: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of [`ClinicStore::find_appointments`] calls served so far.
  pub fn slot_reads(&self) -> usize { self.slot_reads.load(Ordering::SeqCst) }

  /// Make every subsequent write fail with [`MemoryError::Unavailable`].
  pub fn set_fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    // A poisoned lock only means another test thread panicked mid-write.
    self.inner.lock().unwrap_or_else(|p| p.into_inner())
  }

  fn check_writable(&self) -> Result<(), MemoryError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryError::Unavailable);
    }
    Ok(())
  }
}

fn sorted(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
  appointments.sort_by_key(|a| (a.scheduled_at, a.created_at));
  appointments
}

impl ClinicStore for MemoryStore {
  type Error = MemoryError;

  // ── Appointments ──────────────────────────────────────────────────────────

  async fn insert_appointment(&self, input: NewAppointment) -> Result<Appointment, MemoryError> {
    self.check_writable()?;
    let mut inner = self.lock();
    inner.check_slot_free(input.scheduled_at, None)?;

    let now = Utc::now();
    let appointment = Appointment {
      appointment_id:   Uuid::new_v4(),
      client_id:        input.client_id,
      pet_id:           input.pet_id,
      scheduled_at:     input.scheduled_at,
      duration_minutes: input.duration_minutes,
      kind:             input.kind,
      status:           AppointmentStatus::Scheduled,
      notes:            input.notes,
      has_result:       false,
      created_at:       now,
      updated_at:       now,
    };
    inner
      .appointments
      .insert(appointment.appointment_id, appointment.clone());
    Ok(appointment)
  }

  async fn get_appointment(&self, id: Uuid) -> Result<Option<Appointment>, MemoryError> {
    Ok(self.lock().appointments.get(&id).cloned())
  }

  async fn list_appointments(&self) -> Result<Vec<Appointment>, MemoryError> {
    Ok(sorted(self.lock().appointments.values().cloned().collect()))
  }

  async fn find_appointments(
    &self,
    from: NaiveDateTime,
    to: NaiveDateTime,
  ) -> Result<Vec<Appointment>, MemoryError> {
    self.slot_reads.fetch_add(1, Ordering::SeqCst);
    let found = self
      .lock()
      .appointments
      .values()
      .filter(|a| a.scheduled_at >= from && a.scheduled_at <= to)
      .cloned()
      .collect();
    Ok(sorted(found))
  }

  async fn update_appointment(
    &self,
    id: Uuid,
    patch: AppointmentPatch,
  ) -> Result<Option<Appointment>, MemoryError> {
    self.check_writable()?;
    let mut inner = self.lock();
    let Some(mut appointment) = inner.appointments.get(&id).cloned() else {
      return Ok(None);
    };
    patch.apply_to(&mut appointment);
    if appointment.status.occupies_slot() {
      inner.check_slot_free(appointment.scheduled_at, Some(id))?;
    }
    appointment.updated_at = Utc::now();
    inner.appointments.insert(id, appointment.clone());
    Ok(Some(appointment))
  }

  async fn set_status(
    &self,
    id: Uuid,
    status: AppointmentStatus,
  ) -> Result<Option<Appointment>, MemoryError> {
    self.check_writable()?;
    let mut inner = self.lock();
    let Some(mut appointment) = inner.appointments.get(&id).cloned() else {
      return Ok(None);
    };
    if status.occupies_slot() && !appointment.status.occupies_slot() {
      inner.check_slot_free(appointment.scheduled_at, Some(id))?;
    }
    appointment.status = status;
    appointment.updated_at = Utc::now();
    inner.appointments.insert(id, appointment.clone());
    Ok(Some(appointment))
  }

  // ── Clients & pets ────────────────────────────────────────────────────────

  async fn add_client(&self, input: NewClient) -> Result<Client, MemoryError> {
    self.check_writable()?;
    let client = Client {
      client_id:  Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      phone:      input.phone,
      address:    input.address,
      created_at: Utc::now(),
    };
    self.lock().clients.push(client.clone());
    Ok(client)
  }

  async fn list_clients(&self) -> Result<Vec<Client>, MemoryError> {
    Ok(self.lock().clients.clone())
  }

  async fn add_pet(&self, input: NewPet) -> Result<Pet, MemoryError> {
    self.check_writable()?;
    let mut inner = self.lock();
    if !inner.clients.iter().any(|c| c.client_id == input.client_id) {
      return Err(MemoryError::UnknownClient(input.client_id));
    }
    let pet = Pet {
      pet_id:     Uuid::new_v4(),
      client_id:  input.client_id,
      name:       input.name,
      species:    input.species,
      breed:      input.breed,
      birth_date: input.birth_date,
      created_at: Utc::now(),
    };
    inner.pets.push(pet.clone());
    Ok(pet)
  }

  async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>, MemoryError> {
    Ok(self.lock().pets.iter().find(|p| p.pet_id == id).cloned())
  }

  async fn find_pets_by_name<'a>(&'a self, name: &'a str) -> Result<Vec<Pet>, MemoryError> {
    let wanted = name.trim().to_lowercase();
    Ok(
      self
        .lock()
        .pets
        .iter()
        .filter(|p| p.name.trim().to_lowercase() == wanted)
        .cloned()
        .collect(),
    )
  }

  // ── Exam results ──────────────────────────────────────────────────────────

  async fn insert_exam_result(
    &self,
    appointment_id: Uuid,
    input: NewExamResult,
  ) -> Result<Option<ExamResult>, MemoryError> {
    self.check_writable()?;
    let mut inner = self.lock();
    let Some(appointment) = inner.appointments.get_mut(&appointment_id) else {
      return Ok(None);
    };
    appointment.has_result = true;
    appointment.updated_at = Utc::now();

    let result = ExamResult {
      exam_result_id: Uuid::new_v4(),
      appointment_id,
      pet_id: appointment.pet_id,
      client_id: appointment.client_id,
      exam_name: input.exam_name,
      result_date: input.result_date,
      summary: input.summary,
      attachment_url: input.attachment_url,
      created_at: Utc::now(),
    };
    inner.exam_results.push(result.clone());
    Ok(Some(result))
  }

  async fn list_exam_results(
    &self,
    appointment_id: Option<Uuid>,
  ) -> Result<Vec<ExamResult>, MemoryError> {
    let mut results: Vec<ExamResult> = self
      .lock()
      .exam_results
      .iter()
      .filter(|r| appointment_id.is_none_or(|id| r.appointment_id == id))
      .cloned()
      .collect();
    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(results)
  }
}

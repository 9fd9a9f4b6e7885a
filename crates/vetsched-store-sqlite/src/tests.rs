//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;
use vetsched_core::{
  BusinessHours, Rejection, Scheduler, SchedulingError,
  appointment::{AppointmentKind, AppointmentPatch, AppointmentStatus, NewAppointment},
  exam::NewExamResult,
  patient::{NewClient, NewPet, Pet},
  store::{ClinicStore, StoreError},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// 2024-05-14 is a Tuesday.
fn tuesday() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 14).unwrap() }

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
  day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

async fn pet(s: &SqliteStore, owner: &str, name: &str) -> Pet {
  let client = s
    .add_client(NewClient {
      name:    owner.into(),
      email:   format!("{}@example.com", owner.to_lowercase()),
      phone:   Some("555-0100".into()),
      address: None,
    })
    .await
    .unwrap();
  s.add_pet(NewPet {
    client_id:  client.client_id,
    name:       name.into(),
    species:    "dog".into(),
    breed:      Some("Labrador".into()),
    birth_date: NaiveDate::from_ymd_opt(2019, 3, 2),
  })
  .await
  .unwrap()
}

fn booking(p: &Pet, when: NaiveDateTime) -> NewAppointment {
  NewAppointment::new(p.client_id, p.pet_id, when, AppointmentKind::Consultation)
}

// ─── Appointments ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_appointment() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;

  let created = s
    .insert_appointment(booking(&rex, at(tuesday(), 15, 0)).with_notes("limping"))
    .await
    .unwrap();
  assert_eq!(created.status, AppointmentStatus::Scheduled);
  assert!(!created.has_result);

  let fetched = s
    .get_appointment(created.appointment_id)
    .await
    .unwrap()
    .expect("appointment should exist");
  assert_eq!(fetched.scheduled_at, at(tuesday(), 15, 0));
  assert_eq!(fetched.kind, AppointmentKind::Consultation);
  assert_eq!(fetched.notes.as_deref(), Some("limping"));
  assert_eq!(fetched.duration_minutes, 60);
}

#[tokio::test]
async fn sub_second_start_reads_back_as_returned() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  let precise = tuesday().and_time(NaiveTime::from_hms_nano_opt(15, 0, 0, 123_456_789).unwrap());

  let created = s.insert_appointment(booking(&rex, precise)).await.unwrap();
  assert_eq!(created.scheduled_at, at(tuesday(), 15, 0));
  let fetched = s.get_appointment(created.appointment_id).await.unwrap().unwrap();
  assert_eq!(fetched.scheduled_at, created.scheduled_at);

  let moved = tuesday().and_time(NaiveTime::from_hms_nano_opt(16, 0, 0, 500_000_000).unwrap());
  let patch = AppointmentPatch {
    scheduled_at: Some(moved),
    ..Default::default()
  };
  let updated = s
    .update_appointment(created.appointment_id, patch)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.scheduled_at, at(tuesday(), 16, 0));
  let listed = s.list_appointments().await.unwrap();
  assert_eq!(listed[0].scheduled_at, updated.scheduled_at);
}

#[tokio::test]
async fn get_appointment_missing_returns_none() {
  let s = store().await;
  assert!(s.get_appointment(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_ordered_by_time() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  s.insert_appointment(booking(&rex, at(tuesday(), 16, 0))).await.unwrap();
  s.insert_appointment(booking(&rex, at(tuesday(), 9, 0))).await.unwrap();
  s.insert_appointment(booking(&rex, at(tuesday(), 12, 0))).await.unwrap();

  let hours: Vec<_> = s
    .list_appointments()
    .await
    .unwrap()
    .iter()
    .map(|a| a.slot_hour())
    .collect();
  assert_eq!(hours, vec![9, 12, 16]);
}

#[tokio::test]
async fn find_appointments_is_inclusive_and_day_scoped() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  let wednesday = tuesday().succ_opt().unwrap();
  s.insert_appointment(booking(&rex, at(tuesday(), 9, 0))).await.unwrap();
  s.insert_appointment(booking(&rex, at(tuesday(), 17, 0))).await.unwrap();
  s.insert_appointment(booking(&rex, at(wednesday, 9, 0))).await.unwrap();

  let found = s
    .find_appointments(at(tuesday(), 9, 0), at(tuesday(), 17, 0))
    .await
    .unwrap();
  assert_eq!(found.len(), 2);
  assert!(found.iter().all(|a| a.slot_date() == tuesday()));
}

#[tokio::test]
async fn second_live_booking_in_same_hour_is_refused() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  let luna = pet(&s, "Bruno", "Luna").await;

  let first = s.insert_appointment(booking(&rex, at(tuesday(), 15, 0))).await.unwrap();
  let err = s
    .insert_appointment(booking(&luna, at(tuesday(), 15, 30)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SlotTaken));
  assert!(err.is_slot_taken());

  // Cancelling frees the hour for a new booking.
  s.set_status(first.appointment_id, AppointmentStatus::Cancelled)
    .await
    .unwrap();
  s.insert_appointment(booking(&luna, at(tuesday(), 15, 0))).await.unwrap();
}

#[tokio::test]
async fn update_applies_only_present_fields() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  let created = s
    .insert_appointment(booking(&rex, at(tuesday(), 10, 0)).with_notes("first visit"))
    .await
    .unwrap();

  let updated = s
    .update_appointment(created.appointment_id, AppointmentPatch {
      scheduled_at: Some(at(tuesday(), 11, 0)),
      kind: Some(AppointmentKind::Vaccination),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.scheduled_at, at(tuesday(), 11, 0));
  assert_eq!(updated.kind, AppointmentKind::Vaccination);
  assert_eq!(updated.notes.as_deref(), Some("first visit"));
  assert!(updated.updated_at >= created.updated_at);

  let cleared = s
    .update_appointment(created.appointment_id, AppointmentPatch {
      notes: Some(None),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(cleared.notes, None);
  assert_eq!(cleared.scheduled_at, at(tuesday(), 11, 0));
}

#[tokio::test]
async fn moving_into_a_taken_hour_is_refused() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  s.insert_appointment(booking(&rex, at(tuesday(), 9, 0))).await.unwrap();
  let other = s.insert_appointment(booking(&rex, at(tuesday(), 10, 0))).await.unwrap();

  let err = s
    .update_appointment(other.appointment_id, AppointmentPatch {
      scheduled_at: Some(at(tuesday(), 9, 0)),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(err.is_slot_taken());
}

#[tokio::test]
async fn update_and_status_on_missing_return_none() {
  let s = store().await;
  let patch = AppointmentPatch {
    kind: Some(AppointmentKind::Surgery),
    ..Default::default()
  };
  assert!(s.update_appointment(Uuid::new_v4(), patch).await.unwrap().is_none());
  assert!(
    s.set_status(Uuid::new_v4(), AppointmentStatus::Confirmed)
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Clients & pets ──────────────────────────────────────────────────────────

#[tokio::test]
async fn pets_round_trip_with_birth_date() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  let fetched = s.get_pet(rex.pet_id).await.unwrap().unwrap();
  assert_eq!(fetched, rex);
  assert_eq!(s.list_clients().await.unwrap().len(), 1);
}

#[tokio::test]
async fn pet_lookup_ignores_case_and_whitespace() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  pet(&s, "Bruno", "Luna").await;

  let found = s.find_pets_by_name("  rEX ").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].pet_id, rex.pet_id);
  assert!(s.find_pets_by_name("Rexy").await.unwrap().is_empty());
}

// ─── Exam results ────────────────────────────────────────────────────────────

#[tokio::test]
async fn exam_result_sets_flag_and_lists_newest_first() {
  let s = store().await;
  let rex = pet(&s, "Ana", "Rex").await;
  let appt = s.insert_appointment(booking(&rex, at(tuesday(), 9, 0))).await.unwrap();

  let input = |name: &str| NewExamResult {
    exam_name:      name.into(),
    result_date:    tuesday(),
    summary:        "All values within normal range.".into(),
    attachment_url: None,
  };
  let first = s
    .insert_exam_result(appt.appointment_id, input("Blood panel"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(first.pet_id, rex.pet_id);
  assert_eq!(first.client_id, rex.client_id);
  let second = s
    .insert_exam_result(appt.appointment_id, input("X-ray"))
    .await
    .unwrap()
    .unwrap();

  let flagged = s.get_appointment(appt.appointment_id).await.unwrap().unwrap();
  assert!(flagged.has_result);

  let listed = s.list_exam_results(Some(appt.appointment_id)).await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].exam_result_id, second.exam_result_id);
  assert_eq!(s.list_exam_results(None).await.unwrap().len(), 2);
  assert!(s.list_exam_results(Some(Uuid::new_v4())).await.unwrap().is_empty());
}

#[tokio::test]
async fn exam_result_for_missing_appointment_is_none() {
  let s = store().await;
  let result = s
    .insert_exam_result(Uuid::new_v4(), NewExamResult {
      exam_name:      "Blood panel".into(),
      result_date:    tuesday(),
      summary:        "All values within normal range.".into(),
      attachment_url: None,
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Through the scheduler ───────────────────────────────────────────────────

#[tokio::test]
async fn scheduler_maps_index_violation_to_slot_taken() {
  let s = Arc::new(store().await);
  let scheduler = Scheduler::new(s.clone(), BusinessHours::default());
  let rex = pet(&s, "Ana", "Rex").await;

  // Bypass the engine's listing to simulate a racing second writer.
  s.insert_appointment(booking(&rex, at(tuesday(), 15, 0))).await.unwrap();
  let err = scheduler
    .create(booking(&rex, at(tuesday(), 15, 0)))
    .await
    .unwrap_err();
  match err {
    SchedulingError::Rejected(Rejection::SlotTaken { date, hour }) => {
      assert_eq!(date, tuesday());
      assert_eq!(hour, 15);
    }
    other => panic!("expected SlotTaken, got {other:?}"),
  }
}

#[tokio::test]
async fn scheduler_lists_slots_from_sqlite() {
  let s = Arc::new(store().await);
  let scheduler = Scheduler::new(s.clone(), BusinessHours::default());
  let rex = pet(&s, "Ana", "Rex").await;
  scheduler.create(booking(&rex, at(tuesday(), 10, 0))).await.unwrap();

  let slots = scheduler.list_available_slots(tuesday()).await.unwrap();
  assert_eq!(slots.hours, vec![9, 11, 12, 13, 14, 15, 16, 17]);
}

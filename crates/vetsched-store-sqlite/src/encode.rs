//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Audit timestamps are stored as RFC 3339 strings. Clinic wall-clock times
//! use a fixed-width ISO 8601 form at whole-second precision so that string
//! comparison orders them chronologically. Enum columns hold the lowercase
//! `strum` names. UUIDs are stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use uuid::Uuid;
use vetsched_core::{
  appointment::{Appointment, AppointmentKind, AppointmentStatus},
  exam::ExamResult,
  patient::{Client, Pet},
};

use crate::{Error, Result};

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ───────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

/// Drop the sub-second part, which the local time column does not keep.
pub fn whole_seconds(at: NaiveDateTime) -> NaiveDateTime {
  at.with_nanosecond(0).unwrap_or(at)
}

pub fn encode_local(at: NaiveDateTime) -> String { at.format(LOCAL_FORMAT).to_string() }

pub fn decode_local(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, LOCAL_FORMAT)
    .map_err(|e| Error::Decode(format!("local time {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Enums ────────────────────────────────────────────────────────────────────

pub fn encode_kind(k: AppointmentKind) -> String { k.as_ref().to_owned() }

pub fn decode_kind(s: &str) -> Result<AppointmentKind> {
  AppointmentKind::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown appointment kind: {s:?}")))
}

pub fn encode_status(s: AppointmentStatus) -> String { s.as_ref().to_owned() }

pub fn decode_status(s: &str) -> Result<AppointmentStatus> {
  AppointmentStatus::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown appointment status: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for every appointment read, in [`RawAppointment`] order.
pub const APPOINTMENT_COLUMNS: &str = "appointment_id, client_id, pet_id, \
  scheduled_at, duration_minutes, kind, status, notes, has_result, \
  created_at, updated_at";

/// Raw values read directly from an `appointments` row.
pub struct RawAppointment {
  pub appointment_id:   String,
  pub client_id:        String,
  pub pet_id:           String,
  pub scheduled_at:     String,
  pub duration_minutes: u32,
  pub kind:             String,
  pub status:           String,
  pub notes:            Option<String>,
  pub has_result:       bool,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawAppointment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      appointment_id:   row.get(0)?,
      client_id:        row.get(1)?,
      pet_id:           row.get(2)?,
      scheduled_at:     row.get(3)?,
      duration_minutes: row.get(4)?,
      kind:             row.get(5)?,
      status:           row.get(6)?,
      notes:            row.get(7)?,
      has_result:       row.get(8)?,
      created_at:       row.get(9)?,
      updated_at:       row.get(10)?,
    })
  }

  pub fn into_appointment(self) -> Result<Appointment> {
    Ok(Appointment {
      appointment_id:   decode_uuid(&self.appointment_id)?,
      client_id:        decode_uuid(&self.client_id)?,
      pet_id:           decode_uuid(&self.pet_id)?,
      scheduled_at:     decode_local(&self.scheduled_at)?,
      duration_minutes: self.duration_minutes,
      kind:             decode_kind(&self.kind)?,
      status:           decode_status(&self.status)?,
      notes:            self.notes,
      has_result:       self.has_result,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `clients` row.
pub struct RawClient {
  pub client_id:  String,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub created_at: String,
}

impl RawClient {
  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      client_id:  decode_uuid(&self.client_id)?,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      address:    self.address,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const PET_COLUMNS: &str =
  "pet_id, client_id, name, species, breed, birth_date, created_at";

/// Raw strings read directly from a `pets` row.
pub struct RawPet {
  pub pet_id:     String,
  pub client_id:  String,
  pub name:       String,
  pub species:    String,
  pub breed:      Option<String>,
  pub birth_date: Option<String>,
  pub created_at: String,
}

impl RawPet {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      pet_id:     row.get(0)?,
      client_id:  row.get(1)?,
      name:       row.get(2)?,
      species:    row.get(3)?,
      breed:      row.get(4)?,
      birth_date: row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_pet(self) -> Result<Pet> {
    Ok(Pet {
      pet_id:     decode_uuid(&self.pet_id)?,
      client_id:  decode_uuid(&self.client_id)?,
      name:       self.name,
      species:    self.species,
      breed:      self.breed,
      birth_date: self.birth_date.as_deref().map(decode_date).transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `exam_results` row.
pub struct RawExamResult {
  pub exam_result_id: String,
  pub appointment_id: String,
  pub pet_id:         String,
  pub client_id:      String,
  pub exam_name:      String,
  pub result_date:    String,
  pub summary:        String,
  pub attachment_url: Option<String>,
  pub created_at:     String,
}

impl RawExamResult {
  pub fn into_exam_result(self) -> Result<ExamResult> {
    Ok(ExamResult {
      exam_result_id: decode_uuid(&self.exam_result_id)?,
      appointment_id: decode_uuid(&self.appointment_id)?,
      pet_id:         decode_uuid(&self.pet_id)?,
      client_id:      decode_uuid(&self.client_id)?,
      exam_name:      self.exam_name,
      result_date:    decode_date(&self.result_date)?,
      summary:        self.summary,
      attachment_url: self.attachment_url,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

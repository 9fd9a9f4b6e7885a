//! [`SqliteStore`] — the SQLite implementation of [`ClinicStore`].

use std::path::Path;

use chrono::{NaiveDateTime, Timelike, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vetsched_core::{
  appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment},
  exam::{ExamResult, NewExamResult},
  patient::{Client, NewClient, NewPet, Pet},
  store::ClinicStore,
};

use crate::{
  Result,
  encode::{
    APPOINTMENT_COLUMNS, PET_COLUMNS, RawAppointment, RawClient, RawExamResult, RawPet,
    decode_uuid, encode_date, encode_dt, encode_kind, encode_local, encode_status,
    encode_uuid, whole_seconds,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A clinic store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }

  /// Appointments matching `filter` (a `WHERE` clause over `?1` and `?2`),
  /// ordered by `scheduled_at`.
  async fn select_appointments(
    &self,
    filter: &'static str,
    lower: Option<String>,
    upper: Option<String>,
  ) -> Result<Vec<Appointment>> {
    let raws: Vec<RawAppointment> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {APPOINTMENT_COLUMNS} FROM appointments {filter}
           ORDER BY scheduled_at, created_at"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(lower.iter().chain(upper.iter())),
            RawAppointment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAppointment::into_appointment).collect()
  }
}

// ─── ClinicStore impl ────────────────────────────────────────────────────────

impl ClinicStore for SqliteStore {
  type Error = crate::Error;

  // ── Appointments ──────────────────────────────────────────────────────────

  async fn insert_appointment(&self, input: NewAppointment) -> Result<Appointment> {
    let now = Utc::now();
    let appointment = Appointment {
      appointment_id:   Uuid::new_v4(),
      client_id:        input.client_id,
      pet_id:           input.pet_id,
      scheduled_at:     whole_seconds(input.scheduled_at),
      duration_minutes: input.duration_minutes,
      kind:             input.kind,
      status:           AppointmentStatus::Scheduled,
      notes:            input.notes,
      has_result:       false,
      created_at:       now,
      updated_at:       now,
    };

    let id_str        = encode_uuid(appointment.appointment_id);
    let client_id_str = encode_uuid(appointment.client_id);
    let pet_id_str    = encode_uuid(appointment.pet_id);
    let at_str        = encode_local(appointment.scheduled_at);
    let date_str      = encode_date(appointment.scheduled_at.date());
    let hour          = appointment.scheduled_at.hour();
    let duration      = appointment.duration_minutes;
    let kind_str      = encode_kind(appointment.kind);
    let status_str    = encode_status(appointment.status);
    let notes         = appointment.notes.clone();
    let now_str       = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO appointments (
             appointment_id, client_id, pet_id, scheduled_at, slot_date,
             slot_hour, duration_minutes, kind, status, notes, has_result,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?11)",
          rusqlite::params![
            id_str,
            client_id_str,
            pet_id_str,
            at_str,
            date_str,
            hour,
            duration,
            kind_str,
            status_str,
            notes,
            now_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(appointment)
  }

  async fn get_appointment(&self, id: Uuid) -> Result<Option<Appointment>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAppointment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appointment_id = ?1"
              ),
              rusqlite::params![id_str],
              RawAppointment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAppointment::into_appointment).transpose()
  }

  async fn list_appointments(&self) -> Result<Vec<Appointment>> {
    self.select_appointments("", None, None).await
  }

  async fn find_appointments(
    &self,
    from: NaiveDateTime,
    to:   NaiveDateTime,
  ) -> Result<Vec<Appointment>> {
    self
      .select_appointments(
        "WHERE scheduled_at >= ?1 AND scheduled_at <= ?2",
        Some(encode_local(from)),
        Some(encode_local(to)),
      )
      .await
  }

  async fn update_appointment(
    &self,
    id:    Uuid,
    patch: AppointmentPatch,
  ) -> Result<Option<Appointment>> {
    let id_str        = encode_uuid(id);
    let client_id_str = patch.client_id.map(encode_uuid);
    let pet_id_str    = patch.pet_id.map(encode_uuid);
    let scheduled_at  = patch.scheduled_at.map(whole_seconds);
    let at_str        = scheduled_at.map(encode_local);
    let date_str      = scheduled_at.map(|at| encode_date(at.date()));
    let hour          = scheduled_at.map(|at| at.hour());
    let kind_str      = patch.kind.map(encode_kind);
    let set_notes     = patch.notes.is_some();
    let notes         = patch.notes.flatten();
    let now_str       = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE appointments SET
             client_id    = COALESCE(?2, client_id),
             pet_id       = COALESCE(?3, pet_id),
             scheduled_at = COALESCE(?4, scheduled_at),
             slot_date    = COALESCE(?5, slot_date),
             slot_hour    = COALESCE(?6, slot_hour),
             kind         = COALESCE(?7, kind),
             notes        = CASE WHEN ?8 THEN ?9 ELSE notes END,
             updated_at   = ?10
           WHERE appointment_id = ?1",
          rusqlite::params![
            id_str,
            client_id_str,
            pet_id_str,
            at_str,
            date_str,
            hour,
            kind_str,
            set_notes,
            notes,
            now_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_appointment(id).await
  }

  async fn set_status(
    &self,
    id:     Uuid,
    status: AppointmentStatus,
  ) -> Result<Option<Appointment>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let now_str    = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE appointments SET status = ?2, updated_at = ?3
           WHERE appointment_id = ?1",
          rusqlite::params![id_str, status_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_appointment(id).await
  }

  // ── Clients & pets ────────────────────────────────────────────────────────

  async fn add_client(&self, input: NewClient) -> Result<Client> {
    let client = Client {
      client_id:  Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      phone:      input.phone,
      address:    input.address,
      created_at: Utc::now(),
    };

    let id_str  = encode_uuid(client.client_id);
    let name    = client.name.clone();
    let email   = client.email.clone();
    let phone   = client.phone.clone();
    let address = client.address.clone();
    let at_str  = encode_dt(client.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO clients (client_id, name, email, phone, address, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, phone, address, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(client)
  }

  async fn list_clients(&self) -> Result<Vec<Client>> {
    let raws: Vec<RawClient> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT client_id, name, email, phone, address, created_at
           FROM clients ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawClient {
              client_id:  row.get(0)?,
              name:       row.get(1)?,
              email:      row.get(2)?,
              phone:      row.get(3)?,
              address:    row.get(4)?,
              created_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClient::into_client).collect()
  }

  async fn add_pet(&self, input: NewPet) -> Result<Pet> {
    let pet = Pet {
      pet_id:     Uuid::new_v4(),
      client_id:  input.client_id,
      name:       input.name,
      species:    input.species,
      breed:      input.breed,
      birth_date: input.birth_date,
      created_at: Utc::now(),
    };

    let id_str        = encode_uuid(pet.pet_id);
    let client_id_str = encode_uuid(pet.client_id);
    let name          = pet.name.clone();
    let species       = pet.species.clone();
    let breed         = pet.breed.clone();
    let birth_str     = pet.birth_date.map(encode_date);
    let at_str        = encode_dt(pet.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pets (pet_id, client_id, name, species, breed, birth_date, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, client_id_str, name, species, breed, birth_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(pet)
  }

  async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPet> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PET_COLUMNS} FROM pets WHERE pet_id = ?1"),
              rusqlite::params![id_str],
              RawPet::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPet::into_pet).transpose()
  }

  async fn find_pets_by_name<'a>(&'a self, name: &'a str) -> Result<Vec<Pet>> {
    // NOCASE folds ASCII only, which covers the names the agent passes in.
    let wanted = name.trim().to_owned();

    let raws: Vec<RawPet> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PET_COLUMNS} FROM pets
           WHERE trim(name) = ?1 COLLATE NOCASE
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![wanted], RawPet::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPet::into_pet).collect()
  }

  // ── Exam results ──────────────────────────────────────────────────────────

  async fn insert_exam_result(
    &self,
    appointment_id: Uuid,
    input:          NewExamResult,
  ) -> Result<Option<ExamResult>> {
    let result_id  = Uuid::new_v4();
    let created_at = Utc::now();

    let result_id_str = encode_uuid(result_id);
    let appt_id_str   = encode_uuid(appointment_id);
    let exam_name     = input.exam_name.clone();
    let date_str      = encode_date(input.result_date);
    let summary       = input.summary.clone();
    let url           = input.attachment_url.clone();
    let now_str       = encode_dt(created_at);

    // Insert and flag the appointment in one transaction.
    let owners: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let owners: Option<(String, String)> = tx
          .query_row(
            "SELECT pet_id, client_id FROM appointments WHERE appointment_id = ?1",
            rusqlite::params![appt_id_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let Some((pet_id, client_id)) = owners else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO exam_results (
             exam_result_id, appointment_id, pet_id, client_id, exam_name,
             result_date, summary, attachment_url, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            result_id_str,
            appt_id_str,
            pet_id,
            client_id,
            exam_name,
            date_str,
            summary,
            url,
            now_str,
          ],
        )?;
        tx.execute(
          "UPDATE appointments SET has_result = 1, updated_at = ?2
           WHERE appointment_id = ?1",
          rusqlite::params![appt_id_str, now_str],
        )?;
        tx.commit()?;
        Ok(Some((pet_id, client_id)))
      })
      .await?;

    let Some((pet_id, client_id)) = owners else {
      return Ok(None);
    };

    Ok(Some(ExamResult {
      exam_result_id: result_id,
      appointment_id,
      pet_id: decode_uuid(&pet_id)?,
      client_id: decode_uuid(&client_id)?,
      exam_name: input.exam_name,
      result_date: input.result_date,
      summary: input.summary,
      attachment_url: input.attachment_url,
      created_at,
    }))
  }

  async fn list_exam_results(&self, appointment_id: Option<Uuid>) -> Result<Vec<ExamResult>> {
    let id_str = appointment_id.map(encode_uuid);

    let raws: Vec<RawExamResult> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT exam_result_id, appointment_id, pet_id, client_id, exam_name,
                  result_date, summary, attachment_url, created_at
           FROM exam_results
           WHERE ?1 IS NULL OR appointment_id = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawExamResult {
              exam_result_id: row.get(0)?,
              appointment_id: row.get(1)?,
              pet_id:         row.get(2)?,
              client_id:      row.get(3)?,
              exam_name:      row.get(4)?,
              result_date:    row.get(5)?,
              summary:        row.get(6)?,
              attachment_url: row.get(7)?,
              created_at:     row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExamResult::into_exam_result).collect()
  }
}

//! The two tools the model may call, and their dispatch.
//!
//! Every outcome is a plain string the model can relay: a success line, the
//! rejection reason verbatim, or the generic retry text when the store
//! fails. Nothing here returns an error.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use strum::IntoEnumIterator as _;

use vetsched_core::{
  Scheduler,
  appointment::{AppointmentKind, NewAppointment},
  store::ClinicStore,
};

use crate::{
  clock::ClinicClock,
  model::{ToolCall, ToolDefinition},
};

pub const SCHEDULE_APPOINTMENT: &str = "scheduleAppointment";
pub const LIST_AVAILABLE_SLOTS: &str = "listAvailableSlots";

// ─── Arguments ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAppointmentArgs {
  pub pet_name:  String,
  pub date_time: String,
  #[serde(rename = "type")]
  pub kind:      String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListAvailableSlotsArgs {
  pub date: String,
}

/// JSON-schema descriptions of both tools, in the order they are offered.
pub fn definitions() -> Vec<ToolDefinition> {
  let kinds: Vec<String> = AppointmentKind::iter().map(|k| k.to_string()).collect();
  vec![
    ToolDefinition {
      name:        SCHEDULE_APPOINTMENT,
      description: "Book a new consultation, vaccination, surgery or exam for a \
                    pet. Provide the pet's name, the date and time, and the \
                    appointment type.",
      parameters:  json!({
        "type": "object",
        "properties": {
          "petName":  { "type": "string", "description": "The pet's name." },
          "dateTime": {
            "type": "string",
            "description": "Date and time of the appointment in ISO 8601."
          },
          "type": {
            "type": "string",
            "enum": kinds,
            "description": "The kind of appointment."
          }
        },
        "required": ["petName", "dateTime", "type"]
      }),
    },
    ToolDefinition {
      name:        LIST_AVAILABLE_SLOTS,
      description: "Check which hours are free on a given day. Each \
                    appointment lasts one hour.",
      parameters:  json!({
        "type": "object",
        "properties": {
          "date": {
            "type": "string",
            "description": "The day to check in ISO 8601; only the date part is used."
          }
        },
        "required": ["date"]
      }),
    },
  ]
}

// ─── Tools ───────────────────────────────────────────────────────────────────

/// The scheduling engine as seen by the model.
pub struct ClinicTools<S> {
  scheduler: Scheduler<S>,
  clock:     ClinicClock,
}

impl<S: ClinicStore> ClinicTools<S> {
  pub fn new(scheduler: Scheduler<S>, clock: ClinicClock) -> Self {
    Self { scheduler, clock }
  }

  pub fn clock(&self) -> &ClinicClock { &self.clock }

  /// Run whichever tool `call` names.
  pub async fn dispatch(&self, call: &ToolCall) -> String {
    match call.name.as_str() {
      SCHEDULE_APPOINTMENT => match decode_args(&call.arguments) {
        Ok(args) => self.schedule_appointment(args).await,
        Err(e) => invalid_arguments(&call.name, &e),
      },
      LIST_AVAILABLE_SLOTS => match decode_args(&call.arguments) {
        Ok(args) => self.list_available_slots(args).await,
        Err(e) => invalid_arguments(&call.name, &e),
      },
      other => {
        tracing::warn!(tool = other, "model requested an unknown tool");
        format!("Unknown tool '{other}'.")
      }
    }
  }

  pub async fn schedule_appointment(&self, args: ScheduleAppointmentArgs) -> String {
    let kind = match args.kind.trim().parse::<AppointmentKind>() {
      Ok(kind) => kind,
      Err(_) => return unknown_kind(&args.kind),
    };
    let at = match self.clock.parse_date_time(&args.date_time) {
      Ok(at) => at,
      Err(e) => return e.to_string(),
    };
    let pet = match self.scheduler.find_pet_by_name(&args.pet_name).await {
      Ok(pet) => pet,
      Err(e) => return e.user_message(),
    };

    match self
      .scheduler
      .create(NewAppointment::new(pet.client_id, pet.pet_id, at, kind))
      .await
    {
      Ok(appointment) => format!(
        "Appointment booked: {} for {} on {} at {}.",
        appointment.kind,
        pet.name,
        appointment.scheduled_at.format("%Y-%m-%d"),
        appointment.scheduled_at.format("%H:%M"),
      ),
      Err(e) => e.user_message(),
    }
  }

  pub async fn list_available_slots(&self, args: ListAvailableSlotsArgs) -> String {
    let day = match self.clock.parse_date(&args.date) {
      Ok(day) => day,
      Err(e) => return e.to_string(),
    };
    match self.scheduler.list_available_slots(day).await {
      Ok(slots) => slots.describe(),
      Err(e) => e.user_message(),
    }
  }
}

/// Some models send arguments as a JSON object, others as a string holding
/// one.
fn decode_args<T: DeserializeOwned>(arguments: &Value) -> serde_json::Result<T> {
  match arguments {
    Value::String(raw) => serde_json::from_str(raw),
    other => T::deserialize(other),
  }
}

fn invalid_arguments(tool: &str, e: &serde_json::Error) -> String {
  tracing::debug!(tool, error = %e, "tool arguments rejected");
  format!("Invalid arguments for {tool}: {e}.")
}

fn unknown_kind(given: &str) -> String {
  let kinds: Vec<String> = AppointmentKind::iter().map(|k| k.to_string()).collect();
  format!(
    "Unknown appointment type '{}'. Use one of: {}.",
    given.trim(),
    kinds.join(", ")
  )
}

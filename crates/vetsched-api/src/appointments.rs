//! Handlers for `/appointments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/appointments` | Ordered by start time |
//! | `POST` | `/appointments` | Body: [`NewAppointment`] |
//! | `GET`  | `/appointments/{id}` | 404 if not found |
//! | `PUT`  | `/appointments/{id}` | Body: [`AppointmentPatch`]; only while scheduled |
//! | `POST` | `/appointments/{id}/cancel` | Irreversible |
//! | `POST` | `/appointments/{id}/confirm` | |
//! | `POST` | `/appointments/{id}/complete` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;
use vetsched_agent::ChatModel;
use vetsched_core::{
  appointment::{Appointment, AppointmentPatch, NewAppointment},
  store::ClinicStore,
};

use crate::{ActionResponse, ApiState, error::ApiError};

/// Payload carried next to `success` and `message` on writes.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentBody {
  pub appointment: Appointment,
}

fn written(message: &str, appointment: Appointment) -> Json<ActionResponse<AppointmentBody>> {
  Json(ActionResponse::with(message, AppointmentBody { appointment }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /appointments`
pub async fn list<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
) -> Result<Json<Vec<Appointment>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  Ok(Json(state.scheduler.list().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /appointments`
pub async fn create<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Json(input) = body?;
  let appointment = state.scheduler.create(input).await?;
  Ok((
    StatusCode::CREATED,
    written("Appointment created successfully.", appointment),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /appointments/{id}`
pub async fn get_one<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Appointment>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  Ok(Json(state.scheduler.get(id).await?))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `PUT /appointments/{id}`
pub async fn edit<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<ActionResponse<AppointmentBody>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  let Json(patch) = body?;
  let appointment = state.scheduler.edit(id, patch).await?;
  Ok(written("Appointment updated successfully.", appointment))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /appointments/{id}/cancel`
pub async fn cancel<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ActionResponse<AppointmentBody>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  let appointment = state.scheduler.cancel(id).await?;
  Ok(written("Appointment cancelled successfully.", appointment))
}

/// `POST /appointments/{id}/confirm`
pub async fn confirm<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ActionResponse<AppointmentBody>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  let appointment = state.scheduler.confirm(id).await?;
  Ok(written("Appointment confirmed.", appointment))
}

/// `POST /appointments/{id}/complete`
pub async fn complete<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ActionResponse<AppointmentBody>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  let appointment = state.scheduler.complete(id).await?;
  Ok(written("Appointment completed.", appointment))
}

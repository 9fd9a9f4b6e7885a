//! Handler for `GET /slots?date=YYYY-MM-DD`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vetsched_agent::ChatModel;
use vetsched_core::store::ClinicStore;

use crate::{ActionResponse, ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SlotParams {
  pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotsBody {
  pub date:  NaiveDate,
  /// Free start hours, ascending.
  pub hours: Vec<u32>,
  /// The same hours as `"H:00"` labels.
  pub slots: Vec<String>,
}

/// `GET /slots?date=<date>` — a closed or fully booked day is a rejection.
pub async fn handler<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  params: Result<Query<SlotParams>, QueryRejection>,
) -> Result<Json<ActionResponse<SlotsBody>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Query(params) = params?;
  let available = state.scheduler.list_available_slots(params.date).await?;
  let message = available.describe();
  let slots = available.labels();
  Ok(Json(ActionResponse::with(message, SlotsBody {
    date: available.date,
    hours: available.hours,
    slots,
  })))
}

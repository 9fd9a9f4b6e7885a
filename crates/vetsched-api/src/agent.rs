//! Handler for `POST /agent` — one exchange with the assistant.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use vetsched_agent::ChatModel;
use vetsched_core::store::ClinicStore;

use crate::{ActionResponse, ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct AgentBody {
  pub prompt: String,
}

/// `POST /agent` — body: `{"prompt":"book Rex tomorrow at 3pm"}`
///
/// Tool outcomes, rejections included, arrive inside the model's text, so a
/// completed exchange is always a success.
pub async fn handler<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  body: Result<Json<AgentBody>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let agent = state.agent.as_ref().ok_or(ApiError::AgentUnavailable)?;
  let Json(body) = body?;
  if body.prompt.trim().is_empty() {
    return Err(ApiError::InvalidData("empty prompt".into()));
  }
  let answer = agent.respond(&body.prompt).await?;
  Ok(Json(ActionResponse::ok(answer)))
}

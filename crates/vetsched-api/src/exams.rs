//! Handlers for `/appointments/{id}/exam-results`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/appointments/{id}/exam-results` | Newest first |
//! | `POST` | `/appointments/{id}/exam-results` | Body: [`NewExamResult`]; completed exams only |

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
  exam::{ExamResult, NewExamResult},
  store::ClinicStore,
};

use crate::{ActionResponse, ApiState, error::ApiError};

#[derive(Debug, Clone, Serialize)]
pub struct ExamResultBody {
  pub exam_result: ExamResult,
}

/// `GET /appointments/{id}/exam-results`
pub async fn list<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<ExamResult>>, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  Ok(Json(state.scheduler.exam_results(Some(id)).await?))
}

/// `POST /appointments/{id}/exam-results`
pub async fn attach<S, M>(
  State(state): State<Arc<ApiState<S, M>>>,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<NewExamResult>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClinicStore,
  M: ChatModel,
{
  let Path(id) = path?;
  let Json(input) = body?;
  let exam_result = state.scheduler.attach_exam_result(id, input).await?;
  Ok((
    StatusCode::CREATED,
    Json(ActionResponse::with(
      "Exam result added successfully.",
      ExamResultBody { exam_result },
    )),
  ))
}

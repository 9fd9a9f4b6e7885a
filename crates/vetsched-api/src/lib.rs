//! JSON REST API for vetsched.
//!
//! Exposes an axum [`Router`] over a [`Scheduler`] and, optionally, an
//! [`AppointmentAgent`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vetsched_api::api_router(state))
//! ```

pub mod agent;
pub mod appointments;
pub mod error;
pub mod exams;
pub mod slots;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use serde::Serialize;
use vetsched_agent::{AppointmentAgent, ChatModel};
use vetsched_core::{Scheduler, store::ClinicStore};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Everything the handlers reach. The agent is absent when no language model
/// is configured.
pub struct ApiState<S, M> {
  pub scheduler: Scheduler<S>,
  pub agent:     Option<AppointmentAgent<S, M>>,
}

impl<S, M> ApiState<S, M> {
  pub fn new(scheduler: Scheduler<S>) -> Self {
    Self {
      scheduler,
      agent: None,
    }
  }

  pub fn with_agent(mut self, agent: AppointmentAgent<S, M>) -> Self {
    self.agent = Some(agent);
    self
  }
}

// ─── Response body ───────────────────────────────────────────────────────────

/// The `{success, message}` envelope shared by every write and every error.
/// `data` must serialize as a map; its fields sit next to `success`.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse<T = ()> {
  pub success: bool,
  pub message: String,
  #[serde(flatten)]
  pub data:    Option<T>,
}

impl ActionResponse {
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: message.into(),
      data:    None,
    }
  }

  pub fn ok(message: impl Into<String>) -> Self {
    Self {
      success: true,
      message: message.into(),
      data:    None,
    }
  }
}

impl<T> ActionResponse<T> {
  pub fn with(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: message.into(),
      data:    Some(data),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, M>(state: Arc<ApiState<S, M>>) -> Router<()>
where
  S: ClinicStore + 'static,
  M: ChatModel + 'static,
{
  Router::new()
    // Appointments
    .route(
      "/appointments",
      get(appointments::list::<S, M>).post(appointments::create::<S, M>),
    )
    .route(
      "/appointments/{id}",
      get(appointments::get_one::<S, M>).put(appointments::edit::<S, M>),
    )
    .route("/appointments/{id}/cancel", post(appointments::cancel::<S, M>))
    .route("/appointments/{id}/confirm", post(appointments::confirm::<S, M>))
    .route("/appointments/{id}/complete", post(appointments::complete::<S, M>))
    // Exam results
    .route(
      "/appointments/{id}/exam-results",
      get(exams::list::<S, M>).post(exams::attach::<S, M>),
    )
    // Slots
    .route("/slots", get(slots::handler::<S, M>))
    // Assistant
    .route("/agent", post(agent::handler::<S, M>))
    .with_state(state)
}

//! HTTP server assembly for vetsched.
//!
//! Turns a [`ServerConfig`] and an opened store into an axum [`Router`]:
//! the JSON API under `/api`, request tracing on every route, and the
//! assistant when an `[agent]` section is configured.

pub mod error;
pub mod seed;
pub mod settings;

pub use error::Error;
pub use settings::{AgentConfig, ClinicConfig, ServerConfig};

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use vetsched_agent::{AppointmentAgent, ChatModel, OllamaChat};
use vetsched_api::{ApiState, api_router};
use vetsched_core::{Scheduler, store::ClinicStore};

use error::Result;

// ─── Application state ────────────────────────────────────────────────────────

/// Wire the engine, and the Ollama-backed assistant if configured, over
/// `store`.
pub fn build_state<S: ClinicStore>(
  store: Arc<S>,
  config: &ServerConfig,
) -> Result<ApiState<S, OllamaChat>> {
  let hours = config.clinic.business_hours()?;
  let clock = config.clinic.clock()?;
  let scheduler = Scheduler::new(store, hours).with_utc_offset(clock.utc_offset());

  let mut state = ApiState::new(scheduler.clone());
  match &config.agent {
    Some(agent) => {
      let model = OllamaChat::new(&agent.base_url, agent.model.clone(), agent.timeout_secs)?;
      tracing::info!(model = %agent.model, base_url = %agent.base_url, "assistant enabled");
      state = state.with_agent(AppointmentAgent::new(model, scheduler, clock));
    }
    None => tracing::info!("no [agent] section; assistant disabled"),
  }
  Ok(state)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level axum [`Router`].
pub fn router<S, M>(state: ApiState<S, M>) -> Router
where
  S: ClinicStore + 'static,
  M: ChatModel + 'static,
{
  Router::new()
    .nest("/api", api_router(Arc::new(state)))
    .layer(TraceLayer::new_for_http())
}

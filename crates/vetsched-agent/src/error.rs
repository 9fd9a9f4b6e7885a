//! Error type for `vetsched-agent`.
//!
//! Only failures of the language model itself surface here. Problems with a
//! tool call (bad arguments, rejected bookings, store failures) are turned
//! into plain text for the model and never become an [`AgentError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
  #[error("cannot reach the language model at {0}")]
  Connection(String),

  #[error("language model request timed out after {0}s")]
  Timeout(u64),

  #[error("language model returned {status}: {body}")]
  Model { status: u16, body: String },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unreadable language model reply: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = AgentError> = std::result::Result<T, E>;

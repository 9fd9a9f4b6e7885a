//! Startup errors for the vetsched server.

use thiserror::Error;
use vetsched_agent::AgentError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid clinic configuration: {0}")]
  Clinic(#[from] vetsched_core::Error),

  #[error("invalid utc_offset_minutes: {0}")]
  UtcOffset(i32),

  #[error("cannot build the language model client: {0}")]
  Agent(#[from] AgentError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

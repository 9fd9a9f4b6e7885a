//! Conversational front door to the scheduler.
//!
//! A language model is offered two tools, `scheduleAppointment` and
//! `listAvailableSlots`, backed by the same [`Scheduler`] the HTTP forms
//! use. The policy lives in the engine; this crate only parses the model's
//! arguments and turns every outcome into text the model can relay.
//!
//! [`Scheduler`]: vetsched_core::Scheduler

pub mod clock;
pub mod error;
pub mod flow;
pub mod model;
pub mod ollama;
pub mod tools;

pub use clock::ClinicClock;
pub use error::{AgentError, Result};
pub use flow::AppointmentAgent;
pub use model::{ChatMessage, ChatModel, ModelReply, ToolCall, ToolDefinition};
pub use ollama::OllamaChat;

#[cfg(test)]
mod tests;

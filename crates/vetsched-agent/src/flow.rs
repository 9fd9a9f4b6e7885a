//! [`AppointmentAgent`] — one conversational exchange.

use chrono::NaiveDateTime;
use vetsched_core::{Scheduler, store::ClinicStore};

use crate::{
  Result,
  clock::ClinicClock,
  model::{ChatMessage, ChatModel},
  tools::{self, ClinicTools},
};

/// Answers one utterance, running at most one tool along the way.
pub struct AppointmentAgent<S, M> {
  model: M,
  tools: ClinicTools<S>,
}

impl<S: ClinicStore, M: ChatModel> AppointmentAgent<S, M> {
  pub fn new(model: M, scheduler: Scheduler<S>, clock: ClinicClock) -> Self {
    Self {
      model,
      tools: ClinicTools::new(scheduler, clock),
    }
  }

  pub fn model(&self) -> &M { &self.model }

  pub async fn respond(&self, utterance: &str) -> Result<String> {
    let now = self.tools.clock().now();
    self.respond_at(utterance, now).await
  }

  /// Like [`respond`](Self::respond) with an explicit clinic time.
  ///
  /// The model sees the time and the utterance together. If its first
  /// reply requests tools, only the first request runs; the tool text is
  /// appended and the model is asked once more. Its final text is returned
  /// as-is, even if it asks for yet another tool.
  pub async fn respond_at(&self, utterance: &str, now: NaiveDateTime) -> Result<String> {
    let definitions = tools::definitions();
    let prompt = format!(
      "The current date and time is {}. {}",
      now.format("%Y-%m-%dT%H:%M:%S"),
      utterance.trim()
    );
    let mut messages = vec![ChatMessage::user(prompt)];

    let first = self.model.chat(&messages, &definitions).await?;
    let Some(call) = first.tool_calls.first().cloned() else {
      return Ok(first.content);
    };
    if first.tool_calls.len() > 1 {
      tracing::debug!(
        requested = first.tool_calls.len(),
        "running only the first tool call"
      );
    }

    let output = self.tools.dispatch(&call).await;
    tracing::info!(tool = %call.name, output = %output, "agent tool call");

    messages.push(ChatMessage::assistant(first));
    messages.push(ChatMessage::tool(output));
    let last = self.model.chat(&messages, &definitions).await?;
    Ok(last.content)
  }
}

//! [`OllamaChat`] — a [`ChatModel`] over Ollama's `/api/chat` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  AgentError, Result,
  model::{ChatMessage, ChatModel, ModelReply, Role, ToolCall, ToolDefinition},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Async HTTP client for a local or remote Ollama instance.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OllamaChat {
  client:       Client,
  base_url:     String,
  model:        String,
  timeout_secs: u64,
}

impl OllamaChat {
  pub fn new(base_url: &str, model: impl Into<String>, timeout_secs: u64) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_owned(),
      model: model.into(),
      timeout_secs,
    })
  }

  pub fn model(&self) -> &str { &self.model }

  fn url(&self, path: &str) -> String { format!("{}/api{}", self.base_url, path) }

  fn send_error(&self, e: reqwest::Error) -> AgentError {
    if e.is_connect() {
      AgentError::Connection(self.base_url.clone())
    } else if e.is_timeout() {
      AgentError::Timeout(self.timeout_secs)
    } else {
      AgentError::Http(e)
    }
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:    &'a str,
  messages: Vec<WireMessage>,
  tools:    Vec<WireTool<'a>>,
  stream:   bool,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
  role:       Role,
  #[serde(default)]
  content:    String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  tool_calls: Vec<WireToolCall>,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
  function: WireFunction,
}

#[derive(Serialize, Deserialize)]
struct WireFunction {
  name:      String,
  #[serde(default)]
  arguments: Value,
}

#[derive(Serialize)]
struct WireTool<'a> {
  #[serde(rename = "type")]
  kind:     &'static str,
  function: &'a ToolDefinition,
}

#[derive(Deserialize)]
struct ChatResponse {
  message: WireMessage,
}

impl From<&ChatMessage> for WireMessage {
  fn from(m: &ChatMessage) -> Self {
    Self {
      role:       m.role,
      content:    m.content.clone(),
      tool_calls: m
        .tool_calls
        .iter()
        .map(|c| WireToolCall {
          function: WireFunction {
            name:      c.name.clone(),
            arguments: c.arguments.clone(),
          },
        })
        .collect(),
    }
  }
}

impl From<WireMessage> for ModelReply {
  fn from(m: WireMessage) -> Self {
    Self {
      content:    m.content,
      tool_calls: m
        .tool_calls
        .into_iter()
        .map(|c| ToolCall {
          name:      c.function.name,
          arguments: c.function.arguments,
        })
        .collect(),
    }
  }
}

// ─── ChatModel impl ──────────────────────────────────────────────────────────

impl ChatModel for OllamaChat {
  async fn chat<'a>(
    &'a self,
    messages: &'a [ChatMessage],
    tools: &'a [ToolDefinition],
  ) -> Result<ModelReply> {
    let body = ChatRequest {
      model:    &self.model,
      messages: messages.iter().map(WireMessage::from).collect(),
      tools:    tools
        .iter()
        .map(|function| WireTool {
          kind: "function",
          function,
        })
        .collect(),
      stream:   false,
    };

    tracing::debug!(model = %self.model, messages = messages.len(), "POST /api/chat");
    let resp = self
      .client
      .post(self.url("/chat"))
      .json(&body)
      .send()
      .await
      .map_err(|e| self.send_error(e))?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(AgentError::Model {
        status: status.as_u16(),
        body,
      });
    }

    let bytes = resp.bytes().await.map_err(|e| self.send_error(e))?;
    let reply: ChatResponse = serde_json::from_slice(&bytes)?;
    Ok(reply.message.into())
  }
}

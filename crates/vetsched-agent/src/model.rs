//! The conversation types and the [`ChatModel`] seam.
//!
//! The agent talks to any model through this trait; [`OllamaChat`] is the
//! HTTP implementation and tests substitute a scripted one.
//!
//! [`OllamaChat`]: crate::ollama::OllamaChat

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
  Tool,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
  pub role:       Role,
  pub content:    String,
  pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role:       Role::User,
      content:    content.into(),
      tool_calls: Vec::new(),
    }
  }

  /// Echo a model reply back into the history.
  pub fn assistant(reply: ModelReply) -> Self {
    Self {
      role:       Role::Assistant,
      content:    reply.content,
      tool_calls: reply.tool_calls,
    }
  }

  /// The text a tool produced.
  pub fn tool(content: impl Into<String>) -> Self {
    Self {
      role:       Role::Tool,
      content:    content.into(),
      tool_calls: Vec::new(),
    }
  }
}

/// A request from the model to run a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
  pub name:      String,
  #[serde(default)]
  pub arguments: Value,
}

/// A tool offered to the model, with its arguments as a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
  pub name:        &'static str,
  pub description: &'static str,
  pub parameters:  Value,
}

/// What the model said: free text, tool requests, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
  pub content:    String,
  pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
  pub fn text(content: impl Into<String>) -> Self {
    Self {
      content:    content.into(),
      tool_calls: Vec::new(),
    }
  }

  pub fn tool_call(name: impl Into<String>, arguments: Value) -> Self {
    Self {
      content:    String::new(),
      tool_calls: vec![ToolCall {
        name: name.into(),
        arguments,
      }],
    }
  }
}

/// A chat-completion model that may request tool calls.
pub trait ChatModel: Send + Sync {
  fn chat<'a>(
    &'a self,
    messages: &'a [ChatMessage],
    tools: &'a [ToolDefinition],
  ) -> impl Future<Output = Result<ModelReply>> + Send + 'a;
}

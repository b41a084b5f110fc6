//! AI Client Strategy Pattern
//!
//! Defines the single contract the router has with the AI backend. Concrete
//! adapters (Ollama, or any other chat backend with native tool calling)
//! live in the runtime crate and implement this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::tool::{ToolCall, ToolDefinition};

/// Response from a single AI chat call
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Completion {
    /// Assistant message content
    pub message: String,

    /// Tool invocations the AI requested, in request order
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(message: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            message: message.into(),
            tool_calls,
        }
    }
}

/// Strategy trait for AI chat backends
///
/// Given an ordered message history and an optional tool schema set, return
/// an assistant message plus zero or more requested tool invocations. Tool
/// arguments stay opaque JSON here; only the owning tool decodes them.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Run one chat turn. Pass an empty `tools` slice to disable tool use.
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Completion>;

    /// Check whether the backend is reachable and configured correctly
    async fn health_check(&self) -> bool {
        true
    }
}

//! Ollama AI Client
//!
//! Implementation of `AiClient` for local Ollama inference. Speaks the
//! `/api/chat` endpoint directly so tool definitions and tool calls ride
//! the native function-calling fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use dispatch_core::{
    AiClient, Completion, DispatchError, Message, Result, ToolCall, ToolDefinition,
};

/// Ollama client configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    pub base_url: String,

    /// Model to chat with
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama2".into(),
            timeout_secs: 30,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OLLAMA_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("OLLAMA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Ollama chat client
pub struct OllamaClient {
    http: reqwest::Client,
    config: OllamaConfig,
}

// Wire types for /api/chat. Core `Message` and `ToolDefinition` already
// serialize to the shapes Ollama expects, so they ride through as-is.

#[derive(Serialize)]
struct ApiChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolDefinition],
}

#[derive(Deserialize)]
struct ApiChatResponse {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: String,

    #[serde(default)]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Deserialize)]
struct ApiToolCall {
    function: ApiFunctionCall,
}

#[derive(Deserialize)]
struct ApiFunctionCall {
    name: String,

    #[serde(default)]
    arguments: serde_json::Value,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DispatchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OllamaConfig::from_env())
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn convert_response(response: ApiChatResponse) -> Completion {
        let tool_calls = response
            .message
            .tool_calls
            .into_iter()
            .enumerate()
            .map(|(i, call)| {
                ToolCall::new(format!("call_{i}"), call.function.name, call.function.arguments)
            })
            .collect();

        Completion {
            message: response.message.content,
            tool_calls,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> DispatchError {
        if err.is_timeout() {
            DispatchError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            DispatchError::Upstream(err.to_string())
        }
    }
}

#[async_trait]
impl AiClient for OllamaClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Completion> {
        let request = ApiChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            tools,
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.config.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?
            .error_for_status()
            .map_err(|e| DispatchError::Upstream(e.to_string()))?
            .json::<ApiChatResponse>()
            .await
            .map_err(|e| DispatchError::Upstream(format!("bad chat response: {e}")))?;

        tracing::debug!(
            model = %self.config.model,
            tool_calls = response.message.tool_calls.len(),
            "ollama chat completed"
        );

        Ok(Self::convert_response(response))
    }

    async fn health_check(&self) -> bool {
        let probe = self
            .http
            .get(format!("{}/api/tags", self.config.base_url))
            .send()
            .await;

        match probe {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!("ollama health check failed: {}", e);
                false
            }
        }
    }
}

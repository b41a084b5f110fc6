//! Request/Response Envelope
//!
//! The inbound request and the single response shape every route produces,
//! success or failure. The HTTP layer serializes these verbatim.

use serde::{Deserialize, Serialize};

use crate::caller::Caller;

/// Inbound chat request
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    /// Raw natural-language user message
    pub user_input: String,

    /// Identity of the integration/tenant issuing the request
    pub caller: Caller,

    /// Session identifier; carried, not interpreted
    #[serde(default = "default_session_id")]
    pub session_id: String,

    /// Caller-supplied auth token; carried, not interpreted
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_session_id() -> String {
    "default".into()
}

impl ChatRequest {
    pub fn new(user_input: impl Into<String>, caller: impl Into<Caller>) -> Self {
        Self {
            user_input: user_input.into(),
            caller: caller.into(),
            session_id: default_session_id(),
            auth_token: None,
        }
    }
}

/// Envelope status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Outbound chat response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: ResponseStatus,

    /// Natural-language answer, or a human-readable failure message
    pub message: String,

    /// Executed tool calls and other structured payload, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Task code; carried in the envelope, never populated by this core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_code: Option<String>,
}

impl ChatResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
            task_code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
            task_code: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

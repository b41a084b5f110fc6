//! Tool System
//!
//! Tools are named, schema-described capabilities the AI backend may request
//! be invoked. The registry keys enabled tools by name and executes batches
//! of requested calls with per-call error isolation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::caller::Caller;
use crate::error::{DispatchError, Result};

/// Tool definition schema (LLM function-calling wire shape)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Always `"function"`
    #[serde(rename = "type")]
    pub kind: String,

    pub function: FunctionDef,
}

/// Function definition inside a tool definition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,

    /// JSON Schema for the tool's arguments
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function".into(),
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// An AI-requested tool invocation
///
/// Produced by the AI backend with `result` unset; the registry populates
/// `result` during batch execution, success or structured error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier for tracking
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Opaque arguments, decoded only by the owning tool
    pub arguments: serde_json::Value,

    /// Execution result, present only after execution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
            result: None,
        }
    }
}

/// Tool trait - a named capability with a self-described schema
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool identifier
    fn name(&self) -> &str;

    /// Human-readable description (shown to the LLM)
    fn description(&self) -> &str;

    /// Schema for LLM function calling; immutable per tool
    fn definition(&self) -> ToolDefinition;

    /// Execute with opaque JSON arguments, returning an opaque JSON result
    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value>;
}

/// Registry of enabled tools, keyed by name
///
/// Generic over the tool type so a closed variant set dispatches without
/// trait objects. Immutable after construction, safe for concurrent reads.
pub struct ToolRegistry<T: Tool> {
    tools: HashMap<String, T>,
}

impl<T: Tool> Default for ToolRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tool> ToolRegistry<T> {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool keyed by its name; last registration wins
    pub fn register(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&T> {
        self.tools.get(name)
    }

    /// Get all registered tools (map order)
    pub fn all(&self) -> Vec<&T> {
        self.tools.values().collect()
    }

    /// Registered tool names, sorted for determinism
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Export one definition per registered tool.
    ///
    /// The caller is accepted at the seam but does not filter the set: every
    /// enabled tool is exposed to every caller. Tenancy policy belongs to a
    /// higher layer.
    pub fn definitions(&self, _caller: &Caller) -> Vec<ToolDefinition> {
        self.tools.values().map(Tool::definition).collect()
    }

    /// Execute a batch of requested calls sequentially, in request order.
    ///
    /// Never aborts early: a missing tool or a failed execution becomes a
    /// structured `{"error": ...}` payload on that call's result, and every
    /// call comes back with its `result` populated.
    pub async fn execute_batch(&self, calls: Vec<ToolCall>) -> Vec<ToolCall> {
        let mut executed = Vec::with_capacity(calls.len());

        for mut call in calls {
            let payload = match self.tools.get(&call.name) {
                None => error_payload(&DispatchError::ToolNotFound(call.name.clone())),
                Some(tool) => match tool.execute(call.arguments.clone()).await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                        error_payload(&e)
                    }
                },
            };

            call.result = Some(payload);
            executed.push(call);
        }

        executed
    }
}

fn error_payload(err: &DispatchError) -> serde_json::Value {
    serde_json::json!({ "error": err.to_string() })
}

//! # dispatch-core
//!
//! Core orchestration for the AI dispatch service: the router that classifies
//! user intent, lets the AI backend request tool invocations, executes them
//! through a registry, and merges the results into a final answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Router                                │
//! │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────────┐ │
//! │  │   Intent    │  │     Tool     │  │      AiClient        │ │
//! │  │ Classifier  │──│   Registry   │──│     (Strategy)       │ │
//! │  └─────────────┘  └──────────────┘  └──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `AiClient` trait keeps the concrete LLM backend swappable; the
//! `Tool` trait keeps the tool set swappable. Everything here is immutable
//! after construction and safe to share across request tasks.

pub mod caller;
pub mod client;
pub mod envelope;
pub mod error;
pub mod intent;
pub mod message;
pub mod router;
pub mod tool;

pub use caller::{Caller, KnowledgeBase, KnowledgeId};
pub use client::{AiClient, Completion};
pub use envelope::{ChatRequest, ChatResponse, ResponseStatus};
pub use error::{DispatchError, Result};
pub use intent::Intent;
pub use message::{Message, Role};
pub use router::{RouteStrategy, Router, RouterConfig};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry};

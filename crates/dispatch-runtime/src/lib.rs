//! # dispatch-runtime
//!
//! Concrete AI backend adapters behind the `dispatch_core::AiClient`
//! capability. The core never sees a backend directly; swapping backends
//! means swapping the adapter handed to the router.
//!
//! ## Backends
//!
//! - `ollama` (default feature): local Ollama inference over `/api/chat`
//!   with native tool calling.

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaClient, OllamaConfig};

//! Application State

use std::sync::Arc;

use dispatch_core::{AiClient, Router};
use support_desk::DeskTool;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The orchestration core
    pub router: Arc<Router<DeskTool>>,

    /// AI backend handle, kept for health probes
    pub ai: Arc<dyn AiClient>,
}

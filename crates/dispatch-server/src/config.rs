//! Server Configuration
//!
//! Environment-based configuration with `.env` support loaded in `main`.
//! Defaults mirror the service's original deployment values.

use dispatch_core::{RouteStrategy, RouterConfig};
use dispatch_runtime::OllamaConfig;
use std::time::Duration;

/// Full server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener
    pub bind_addr: String,

    pub ollama: OllamaConfig,
    pub tools: ToolsConfig,
    pub router: RouterConfig,
}

/// Per-tool enablement and backend settings
#[derive(Clone, Debug)]
pub struct ToolsConfig {
    pub weather_enabled: bool,
    pub calculator_enabled: bool,
    pub order_detail_enabled: bool,

    /// Base URL of the order backend
    pub order_base_url: String,

    /// Bearer token for the order backend
    pub order_api_key: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let ollama = OllamaConfig::from_env();

        let strategy = match env_or("ROUTE_STRATEGY", "intent").as_str() {
            "single_pass" => RouteStrategy::SinglePass,
            _ => RouteStrategy::IntentBranching,
        };

        let router = RouterConfig {
            strategy,
            ai_timeout: Some(Duration::from_secs(ollama.timeout_secs)),
            warm_order_backend: env_flag("WARM_ORDER_BACKEND", false),
        };

        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            ollama,
            tools: ToolsConfig {
                weather_enabled: env_flag("TOOL_WEATHER_ENABLED", true),
                calculator_enabled: env_flag("TOOL_CALCULATOR_ENABLED", true),
                order_detail_enabled: env_flag("TOOL_ORDER_DETAIL_ENABLED", true),
                order_base_url: env_or("ORDER_BACKEND_BASE_URL", "http://localhost:9000"),
                order_api_key: env_or("ORDER_BACKEND_API_KEY", ""),
            },
            router,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parsing() {
        assert!(!env_flag("DISPATCH_TEST_UNSET_FLAG", false));
        assert!(env_flag("DISPATCH_TEST_UNSET_FLAG", true));
    }
}

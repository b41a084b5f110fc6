//! AI Dispatch HTTP Server
//!
//! Axum-based server exposing the routing core over REST. Wires the Ollama
//! backend, the desk tool registry, and the router from environment
//! configuration.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router as AxumRouter,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dispatch_core::{AiClient, Router, ToolRegistry};
use dispatch_runtime::OllamaClient;
use support_desk::{Calculator, DeskTool, HttpOrderBackend, OrderDetail, Weather};

use crate::config::{ServerConfig, ToolsConfig};
use crate::handlers::{chat_handler, health_check};
use crate::state::AppState;

fn build_registry(cfg: &ToolsConfig) -> ToolRegistry<DeskTool> {
    let mut tools = ToolRegistry::new();

    if cfg.weather_enabled {
        tools.register(DeskTool::Weather(Weather::new()));
    }

    if cfg.calculator_enabled {
        tools.register(DeskTool::Calculator(Calculator));
    }

    if cfg.order_detail_enabled {
        let backend = Arc::new(HttpOrderBackend::new(
            cfg.order_base_url.clone(),
            cfg.order_api_key.clone(),
        ));
        tools.register(DeskTool::OrderDetail(OrderDetail::new(backend)));
    }

    tools
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();

    // Initialize AI backend
    let ai = Arc::new(OllamaClient::new(config.ollama.clone())?);

    if ai.health_check().await {
        tracing::info!(
            base_url = %config.ollama.base_url,
            model = %config.ollama.model,
            "connected to Ollama"
        );
    } else {
        tracing::warn!("Ollama not available - routes will fail until it is");
        tracing::warn!("  make sure Ollama is running: ollama serve");
    }

    // Assemble the tool registry from config
    let tools = build_registry(&config.tools);
    tracing::info!("registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // No knowledge retrieval service is wired yet; knowledge_qa routes
    // answer with a service-unavailable envelope until one is configured.
    let router = Router::new(
        ai.clone(),
        Arc::new(tools),
        None,
        config.router.clone(),
    );

    let state = AppState {
        router: Arc::new(router),
        ai,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/v1/chat", post(chat_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("dispatch server running on http://{}", config.bind_addr);
    tracing::info!("  GET  /health       - health check");
    tracing::info!("  POST /api/v1/chat  - route a chat request");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

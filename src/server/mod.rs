//! Callable HTTP endpoint
//!
//! Exposes the suggestion flow as a remote procedure that any web front-end
//! can call, with CORS open to every origin.

pub mod error;
pub mod handlers;
pub mod protocol;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agents::SuggestionEngine;
use crate::config::ServerConfig;
use crate::{log_error, log_info};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SuggestionEngine>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<dyn SuggestionEngine>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Build the router with the callable function mounted at `function_path`
pub fn router(state: AppState, function_path: &str) -> Router {
    let path = if function_path.starts_with('/') {
        function_path.to_string()
    } else {
        format!("/{function_path}")
    };

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(&path, post(handlers::suggest_project))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the callable endpoint until Ctrl-C
pub async fn serve(config: &ServerConfig, engine: Arc<dyn SuggestionEngine>) -> Result<()> {
    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind))?;

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log_error!("Failed to bind {}: {}", addr, e);
            return Err(e).with_context(|| format!("Failed to bind {addr}"));
        }
    };

    log_info!(
        "Serving suggestions on http://{}{}",
        addr,
        config.function_path
    );

    axum::serve(listener, router(AppState::new(engine), &config.function_path))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log_info!("Shutting down");
    }
}

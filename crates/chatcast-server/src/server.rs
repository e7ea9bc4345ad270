//! HTTP server and routing.

use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rust_embed::RustEmbed;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::connection::handle_connection;
use crate::ChatServerState;

/// Embedded browser client.
#[derive(RustEmbed)]
#[folder = "src/static/"]
struct StaticAssets;

/// Create the Axum router for the chat server.
///
/// Cross-origin requests are accepted from any origin.
pub fn create_router(state: Arc<ChatServerState>) -> Router {
    Router::new()
        // Browser client
        .route("/", get(serve_index))
        .route("/style.css", get(serve_css))
        .route("/app.js", get(serve_js))
        // Chat channel
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/api/info", get(api_info))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn serve_asset(name: &str, content_type: &'static str) -> Response {
    match StaticAssets::get(name) {
        Some(content) => (
            [(header::CONTENT_TYPE, content_type)],
            content.data.into_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, format!("{} not found", name)).into_response(),
    }
}

async fn serve_index() -> Response {
    serve_asset("index.html", "text/html; charset=utf-8")
}

async fn serve_css() -> Response {
    serve_asset("style.css", "text/css")
}

async fn serve_js() -> Response {
    serve_asset("app.js", "application/javascript")
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ChatServerState>>,
) -> Response {
    let shutdown = state.shutdown_token();
    ws.on_upgrade(move |socket| handle_connection(socket, state, shutdown))
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<ChatServerState>>) -> impl IntoResponse {
    let status = if state.is_started() { "ok" } else { "starting" };

    Json(serde_json::json!({
        "status": status,
        "connections": state.registry.len(),
    }))
}

/// API info endpoint.
async fn api_info() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "chatcast",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "websocket": "/ws",
            "health": "/health",
            "info": "/api/info"
        }
    }))
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

//! HTTP request handlers

use super::types::HealthResponse;
use super::ws::WebSocketConnection;
use super::AppState;
use crate::session::SessionRuntime;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Voice sessions, one per connection
        .route("/ws", get(upgrade_session))
        .route("/health", get(health))
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Sessions
// ============================================================

async fn upgrade_session(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let session_id = uuid::Uuid::new_v4().to_string();
        let connection = WebSocketConnection::new(socket, session_id.clone(), state.inbound_queue);
        SessionRuntime::new(session_id, connection, state.services)
            .run()
            .await;
    })
}

// ============================================================
// Health & Version
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.synthesis_enabled))
}

async fn get_version() -> &'static str {
    concat!("iris-voice ", env!("CARGO_PKG_VERSION"))
}

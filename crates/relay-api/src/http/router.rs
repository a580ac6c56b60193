//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        .route("/", get(root))
        .route("/chat", post(handlers::chat::chat))
        .route("/history", get(handlers::history::get_history))
        .route("/history/clear", post(handlers::history::clear_history))
        .route("/conversations", get(handlers::conversation::list_conversations))
        .route("/conversation/{id}", get(handlers::conversation::get_conversation))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured origins, or wide open when none are set.
///
/// Only the allow-list permits credentials. Credentials cannot be combined
/// with wildcard headers or methods, so that branch mirrors the request.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        // Development: no allow-list configured.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_headers(AllowHeaders::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_credentials(true)
    }
}

/// GET / - Liveness check.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Chatbot running",
    }))
}

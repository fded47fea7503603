pub mod chat;
pub mod models;
pub mod products;
pub mod symptoms;

// Re-exports
pub use models::*;

use axum::{Json, Router, extract::State, http::HeaderMap, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn health_handler(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let total_products = state.products.repository().count().unwrap_or(0);
    Json(models::HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_products,
    })
}

/// Full router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(products::routes())
        .merge(chat::routes())
        .merge(symptoms::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub(crate) fn user_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

use crate::api::chat::handlers::chat_handler;
use crate::api::models::AppState;
use axum::{Router, routing::post};

pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat_handler))
}

use crate::api::models::AppState;
use crate::api::symptoms::handlers::analyze_symptoms_handler;
use axum::{Router, routing::post};

pub fn routes() -> Router<AppState> {
    Router::new().route("/symptom-checker", post(analyze_symptoms_handler))
}

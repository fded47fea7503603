use crate::matcher::RecommendedProduct;
use crate::services::{ChatService, ProductService, SearchType, SymptomChecker};
use crate::storage::InputType;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
    pub chat: Arc<ChatService>,
    pub symptoms: Arc<SymptomChecker>,
}

/// Query string for product search
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchQuery {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub search_type: SearchType,
}

/// Response after seeding the catalog
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub count: usize,
}

/// Request to chat with the assistant
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub recommendations: Vec<RecommendedProduct>,
}

/// Request to analyze symptoms
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRequest {
    #[serde(default)]
    pub symptoms: String,

    #[serde(default)]
    pub input_type: InputType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomResponse {
    pub success: bool,
    pub analysis: String,
    pub confidence: f64,
    pub products: Vec<RecommendedProduct>,
    pub follow_up_question: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_products: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("Please provide a message".to_string());
        }
        Ok(())
    }
}

impl SymptomRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.symptoms.trim().is_empty() {
            return Err("Please provide symptoms to analyze".to_string());
        }
        Ok(())
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// The language model could not be reached or answered badly.
    Upstream(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message,
        }))
        .into_response()
    }
}

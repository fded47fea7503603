use crate::api::models::*;
use crate::api::user_id;
use crate::services::ChatError;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use chrono::SecondsFormat;
use tracing::{error, info};

pub async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;

    // Validate
    request.validate().map_err(AppError::BadRequest)?;

    let user_id = user_id(&headers);
    info!(user_id = %user_id, "Chat message received");

    let reply = state
        .chat
        .chat(&request.message, &user_id)
        .await
        .map_err(|e| match e {
            ChatError::Model(e) => {
                error!(error = %e, "Chat model call failed");
                AppError::Upstream(
                    "Sorry, I encountered an error. Please try again later.".to_string(),
                )
            }
            ChatError::Storage(e) => AppError::Internal(format!("Catalog read failed: {}", e)),
        })?;

    Ok(Json(ChatResponse {
        success: true,
        message: reply.message,
        timestamp: reply.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        recommendations: reply.recommendations,
    }))
}

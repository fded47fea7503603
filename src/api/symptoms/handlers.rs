use crate::api::models::*;
use crate::api::user_id;
use crate::services::SymptomError;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use tracing::{error, info};

pub async fn analyze_symptoms_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SymptomRequest>, JsonRejection>,
) -> Result<Json<SymptomResponse>, AppError> {
    let Json(request) = payload?;

    // Validate
    request.validate().map_err(AppError::BadRequest)?;

    let user_id = user_id(&headers);
    info!(user_id = %user_id, input_type = ?request.input_type, "Analyzing symptoms");

    let report = state
        .symptoms
        .analyze(&request.symptoms, request.input_type, &user_id)
        .await
        .map_err(|e| match e {
            SymptomError::Model(e) => {
                error!(error = %e, "Symptom analysis model call failed");
                AppError::Upstream("Failed to analyze symptoms. Please try again.".to_string())
            }
            SymptomError::Catalog(e) => AppError::Internal(format!("Catalog read failed: {}", e)),
        })?;

    Ok(Json(SymptomResponse {
        success: true,
        analysis: report.analysis,
        confidence: report.confidence,
        products: report.products,
        follow_up_question: report.follow_up_question,
    }))
}

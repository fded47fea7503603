use crate::matcher::RecommendedProduct;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the user supplied their text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Voice,
}

/// A completed symptom check, kept for analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysisRecord {
    pub user_id: String,
    pub symptoms: String,
    pub analysis: String,
    pub confidence: f64,
    pub products: Vec<RecommendedProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
    pub input_type: InputType,
    pub created_at: DateTime<Utc>,
}

/// One chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRecord {
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub input_type: InputType,
    pub created_at: DateTime<Utc>,
}

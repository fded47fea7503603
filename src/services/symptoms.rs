use crate::llm::{LlmError, TextGenerator, extract_keywords, get_ai_analysis};
use crate::matcher::{self, MatchInput, QuestionPicker, RecommendedProduct, follow_up_question};
use crate::storage::{InputType, JsonlStorage, ProductRepository, SymptomAnalysisRecord};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum SymptomError {
    #[error("Symptom analysis failed: {0}")]
    Model(#[from] LlmError),

    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct SymptomReport {
    pub analysis: String,
    pub keywords: Vec<String>,
    pub confidence: f64,
    pub products: Vec<RecommendedProduct>,
    pub follow_up_question: Option<String>,
}

/// Symptoms in, explanation and up to three products out.
pub struct SymptomChecker {
    products: Arc<ProductRepository>,
    generator: Arc<dyn TextGenerator>,
    analyses: Arc<JsonlStorage<SymptomAnalysisRecord>>,
    picker: Arc<dyn QuestionPicker>,
}

impl SymptomChecker {
    pub fn new(
        products: Arc<ProductRepository>,
        generator: Arc<dyn TextGenerator>,
        analyses: Arc<JsonlStorage<SymptomAnalysisRecord>>,
        picker: Arc<dyn QuestionPicker>,
    ) -> Self {
        Self {
            products,
            generator,
            analyses,
            picker,
        }
    }

    pub async fn analyze(
        &self,
        symptoms: &str,
        input_type: InputType,
        user_id: &str,
    ) -> Result<SymptomReport, SymptomError> {
        let analysis = get_ai_analysis(self.generator.as_ref(), symptoms).await?;
        let keywords = extract_keywords(self.generator.as_ref(), symptoms).await;

        let catalog = self.products.get_all_products()?;
        let result = matcher::recommend(&MatchInput::Keywords(keywords.clone()), &catalog);
        let follow_up = follow_up_question(result.confidence, self.picker.as_ref());

        info!(
            ?keywords,
            confidence = result.confidence,
            products = result.products.len(),
            "Symptoms analyzed"
        );

        let record = SymptomAnalysisRecord {
            user_id: user_id.to_string(),
            symptoms: symptoms.to_string(),
            analysis: analysis.clone(),
            confidence: result.confidence,
            products: result.products.clone(),
            follow_up_question: follow_up.clone(),
            input_type,
            created_at: Utc::now(),
        };
        if let Err(e) = self.analyses.append(&record) {
            error!(error = %e, "Failed to store symptom analysis");
        }

        Ok(SymptomReport {
            analysis,
            keywords,
            confidence: result.confidence,
            products: result.products,
            follow_up_question: follow_up,
        })
    }
}

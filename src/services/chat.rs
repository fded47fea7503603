use crate::llm::{CompletionRequest, LlmError, TextGenerator};
use crate::matcher::{self, MatchInput, RecommendedProduct};
use crate::storage::{ChatMessageRecord, InputType, JsonlStorage, Product, ProductRepository};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const EMPTY_REPLY: &str = "Sorry, I could not generate a response.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub message: String,
    pub recommendations: Vec<RecommendedProduct>,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatService {
    products: Arc<ProductRepository>,
    generator: Arc<dyn TextGenerator>,
    log: Arc<JsonlStorage<ChatMessageRecord>>,
}

impl ChatService {
    pub fn new(
        products: Arc<ProductRepository>,
        generator: Arc<dyn TextGenerator>,
        log: Arc<JsonlStorage<ChatMessageRecord>>,
    ) -> Self {
        Self {
            products,
            generator,
            log,
        }
    }

    /// Answer a user message with the catalog as context.
    pub async fn chat(&self, message: &str, user_id: &str) -> Result<ChatReply, ChatError> {
        let products = self.products.get_all_products()?;
        let request = CompletionRequest::new(system_prompt(&products), message)
            .temperature(0.7)
            .max_tokens(500);

        let reply = self.generator.complete(&request).await?;
        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply
        };

        let recommendations =
            matcher::recommend(&MatchInput::ResponseText(reply.clone()), &products).products;
        info!(
            model = self.generator.model_name(),
            recommended = recommendations.len(),
            "Chat reply generated"
        );

        let timestamp = Utc::now();
        let record = ChatMessageRecord {
            user_id: user_id.to_string(),
            message: message.to_string(),
            response: reply.clone(),
            input_type: InputType::Text,
            created_at: timestamp,
        };
        if let Err(e) = self.log.append(&record) {
            error!(error = %e, "Failed to store chat message");
        }

        Ok(ChatReply {
            message: reply,
            recommendations,
            timestamp,
        })
    }
}

/// Numbered product listing handed to the model.
pub fn product_context(products: &[Product]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{}. {} - ${}\n   Description: {}\n   Tags: {}",
                i + 1,
                p.title,
                p.price,
                p.description,
                p.tags.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn system_prompt(products: &[Product]) -> String {
    format!(
        r#"You are a helpful AI assistant for "Smart Health Store", an online healthcare and wellness store. Your role is to:

1. Answer health-related questions professionally and accurately
2. Recommend products from our store that match the user's needs
3. Provide health advice (but always remind users to consult healthcare professionals for serious issues)
4. Be friendly, empathetic, and supportive

Available Products in our store:
{}

Guidelines:
- When recommending products, mention the product name and price
- Always prioritize user safety and health
- For serious medical conditions, advise consulting a doctor
- Be conversational and helpful
- Keep responses concise but informative"#,
        product_context(products)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct Echo(&'static str);

    #[async_trait]
    impl TextGenerator for Echo {
        async fn complete(&self, _request: &CompletionRequest) -> crate::llm::Result<String> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn service(
        dir: &TempDir,
        reply: &'static str,
    ) -> (ChatService, Arc<JsonlStorage<ChatMessageRecord>>) {
        let products = Arc::new(ProductRepository::new(dir.path().join("products.jsonl")));
        products.initialize().unwrap();
        products.seed_products().unwrap();
        let log: Arc<JsonlStorage<ChatMessageRecord>> =
            Arc::new(JsonlStorage::new(dir.path().join("chat.jsonl")));
        log.initialize().unwrap();
        (ChatService::new(products, Arc::new(Echo(reply)), log.clone()), log)
    }

    #[test]
    fn context_lists_products_in_order() {
        let context = product_context(&crate::storage::products::sample_products()[..2]);
        assert!(context.starts_with("1. Calcium + Vitamin D3 Tablets - $24.99\n   Description:"));
        assert!(context.contains("\n\n2. Omega-3 Fish Oil Capsules - $29.99"));
        assert!(context.contains("Tags: heart health, omega-3, brain"));
    }

    #[tokio::test]
    async fn reply_is_scanned_for_products_and_logged() {
        let dir = TempDir::new().unwrap();
        let (service, log) = service(&dir, "Try our Magnesium Glycinate ($19.99) tonight.");

        let reply = service.chat("I can't sleep", "u1").await.unwrap();

        assert_eq!(reply.recommendations.len(), 1);
        assert_eq!(reply.recommendations[0].name, "Magnesium Glycinate");
        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "u1");
        assert_eq!(records[0].message, "I can't sleep");
    }

    #[tokio::test]
    async fn empty_reply_uses_apology() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir, "");

        let reply = service.chat("hello", "anonymous").await.unwrap();

        assert_eq!(reply.message, EMPTY_REPLY);
        assert!(reply.recommendations.is_empty());
    }
}

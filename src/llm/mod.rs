//! Text generation behind an async trait.
//!
//! The production implementation talks to an OpenAI-compatible chat
//! completions endpoint; services only see `Arc<dyn TextGenerator>`.

pub mod openrouter;
pub mod prompts;

pub use openrouter::OpenRouterClient;
pub use prompts::{
    direct_search_matches, extract_keywords, extract_search_keywords, get_ai_analysis,
    parse_keyword_list,
};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected model response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single chat completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the first choice's text. An empty string means the model said nothing.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

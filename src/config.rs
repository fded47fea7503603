use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub referer: String,
    pub title: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: String::new(),
            model: "google/gemini-2.0-flash-001".to_string(),
            referer: "http://localhost:5000".to_string(),
            title: "Smart Health Store".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub products_path: PathBuf,
    pub analyses_path: PathBuf,
    pub chat_log_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            products_path: PathBuf::from("data/products.jsonl"),
            analyses_path: PathBuf::from("data/symptom_analyses.jsonl"),
            chat_log_path: PathBuf::from("data/chat_messages.jsonl"),
        }
    }
}

impl AppConfig {
    /// Load `APP_CONFIG` (default `config.toml`), then apply env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok());

        if config.llm.api_key.is_empty() {
            warn!("OPENROUTER_API_KEY not set, model calls will be rejected upstream");
        }
        Ok(config)
    }

    /// Parse a TOML file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = ?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!(value = %port, error = %e, "Ignoring invalid PORT"),
            }
        }
        if let Some(key) = lookup("OPENROUTER_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("OPENROUTER_BASE_URL") {
            self.llm.base_url = url;
        }
    }
}

use crate::llm::{TextGenerator, extract_search_keywords};
use crate::storage::{CatalogError, Product, ProductRepository};
use anyhow::Result;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Normal,
    Ai,
}

pub struct ProductService {
    repository: Arc<ProductRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl ProductService {
    pub fn new(repository: Arc<ProductRepository>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            repository,
            generator,
        }
    }

    pub fn repository(&self) -> &ProductRepository {
        &self.repository
    }

    pub fn create_product(&self, product: Product) -> Result<Product, CatalogError> {
        self.repository.create_product(product)
    }

    pub fn seed_products(&self) -> Result<usize> {
        self.repository.seed_products()
    }

    /// Title search, or tag search on model-extracted keywords for `Ai`.
    pub async fn search(&self, query: &str, search_type: SearchType) -> Result<Vec<Product>> {
        let products = self.repository.get_all_products()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(products);
        }

        if search_type == SearchType::Normal {
            return filter_by_title(products, query);
        }

        let keywords = extract_search_keywords(self.generator.as_ref(), query).await;
        info!(query, ?keywords, "AI product search");

        if keywords.is_empty() {
            return filter_by_title(products, query);
        }

        let patterns = keywords
            .iter()
            .map(|k| case_insensitive(k))
            .collect::<Result<Vec<Regex>, _>>()?;
        Ok(products
            .into_iter()
            .filter(|p| {
                p.tags
                    .iter()
                    .any(|tag| patterns.iter().any(|re| re.is_match(tag)))
            })
            .collect())
    }
}

fn filter_by_title(products: Vec<Product>, query: &str) -> Result<Vec<Product>> {
    let pattern = case_insensitive(query)?;
    Ok(products
        .into_iter()
        .filter(|p| pattern.is_match(&p.title))
        .collect())
}

/// Case-insensitive regex, matched literally when `pattern` is not a valid regex.
fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionRequest, LlmError};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedReply(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for FixedReply {
        async fn complete(&self, _request: &CompletionRequest) -> crate::llm::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| LlmError::Decode("down".to_string()))
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn service(dir: &TempDir, reply: Option<&'static str>) -> ProductService {
        let repo = Arc::new(ProductRepository::new(dir.path().join("products.jsonl")));
        repo.initialize().unwrap();
        repo.seed_products().unwrap();
        ProductService::new(repo, Arc::new(FixedReply(reply)))
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    #[tokio::test]
    async fn blank_query_returns_everything() {
        let dir = TempDir::new().unwrap();
        let found = service(&dir, None).search("  ", SearchType::Ai).await.unwrap();
        assert_eq!(found.len(), 12);
    }

    #[tokio::test]
    async fn normal_search_is_case_insensitive_on_title() {
        let dir = TempDir::new().unwrap();
        let found = service(&dir, None)
            .search("VITAMIN", SearchType::Normal)
            .await
            .unwrap();
        assert_eq!(
            titles(&found),
            vec![
                "Calcium + Vitamin D3 Tablets",
                "Multivitamin Complex",
                "Vitamin B Complex Energy Boost"
            ]
        );
    }

    #[tokio::test]
    async fn invalid_regex_is_matched_literally() {
        let dir = TempDir::new().unwrap();
        let found = service(&dir, None)
            .search("+ vitamin", SearchType::Normal)
            .await
            .unwrap();
        assert_eq!(titles(&found), vec!["Calcium + Vitamin D3 Tablets"]);
    }

    #[tokio::test]
    async fn ai_search_matches_tags() {
        let dir = TempDir::new().unwrap();
        let found = service(&dir, Some("sleep, stress"))
            .search("I can't rest at night", SearchType::Ai)
            .await
            .unwrap();
        assert_eq!(
            titles(&found),
            vec!["Sleep Support Melatonin", "Magnesium Glycinate"]
        );
    }

    #[tokio::test]
    async fn ai_search_direct_match_and_title_fallback() {
        let dir = TempDir::new().unwrap();
        let found = service(&dir, None)
            .search("Turmeric", SearchType::Ai)
            .await
            .unwrap();
        // "turmeric" is a direct match, so tags are searched without the model.
        assert_eq!(titles(&found), vec!["Turmeric Curcumin"]);

        let found = service(&dir, None)
            .search("Booster", SearchType::Ai)
            .await
            .unwrap();
        assert_eq!(titles(&found), vec!["Immune System Booster"]);
    }
}

use super::jsonl::JsonlStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    Invalid(String),

    #[error("A product titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub tags: Vec<String>,
    pub image: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Product title cannot be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Product description cannot be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Product price must be a non-negative number".to_string());
        }
        if self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err("Product needs at least one tag".to_string());
        }
        if self.image.trim().is_empty() {
            return Err("Product image cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Product catalog backed by a JSONL file.
pub struct ProductRepository {
    store: JsonlStorage<Product>,
}

impl ProductRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            store: JsonlStorage::new(path),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        self.store.initialize()
    }

    pub fn get_all_products(&self) -> Result<Vec<Product>> {
        self.store.read_all()
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count_lines()
    }

    /// Validate and append a product. Titles are unique, case-insensitively.
    pub fn create_product(&self, product: Product) -> Result<Product, CatalogError> {
        product.validate().map_err(CatalogError::Invalid)?;

        let key = title_key(&product.title);
        let id = self
            .store
            .append_unless(&product, |existing| {
                existing.iter().any(|p| title_key(&p.title) == key)
            })?
            .ok_or_else(|| CatalogError::DuplicateTitle(product.title.clone()))?;

        info!(id, title = %product.title, "Created product");
        Ok(product)
    }

    /// Replace the whole catalog with the sample products.
    pub fn seed_products(&self) -> Result<usize> {
        let products = sample_products();
        self.store.replace_all(&products)?;
        info!(count = products.len(), "Seeded product catalog");
        Ok(products.len())
    }
}

/// Identity of a product title: trimmed and lowercased.
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

fn sample(title: &str, description: &str, price: f64, tags: &[&str], image: &str) -> Product {
    Product {
        title: title.to_string(),
        description: description.to_string(),
        price,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        image: image.to_string(),
        in_stock: true,
    }
}

/// The starter catalog written by `seed_products`.
pub fn sample_products() -> Vec<Product> {
    vec![
        sample(
            "Calcium + Vitamin D3 Tablets",
            "Essential for strong bones and teeth. Helps prevent osteoporosis and supports bone density.",
            24.99,
            &["bone health", "calcium", "vitamin D", "osteoporosis", "bones", "teeth"],
            "https://images.unsplash.com/photo-1584308666744-24d5c474f2ae?w=400",
        ),
        sample(
            "Omega-3 Fish Oil Capsules",
            "Supports heart health, brain function, and reduces inflammation. Rich in EPA and DHA.",
            29.99,
            &["heart health", "omega-3", "brain", "cardiovascular", "inflammation", "fish oil"],
            "https://images.unsplash.com/photo-1505751172876-fa1923c5c528?w=400",
        ),
        sample(
            "Multivitamin Complex",
            "Complete daily nutrition with 20+ essential vitamins and minerals for overall health.",
            19.99,
            &["multivitamin", "energy", "immunity", "wellness", "nutrition", "vitamins"],
            "https://images.unsplash.com/photo-1471864190281-a93a3070b6de?w=400",
        ),
        sample(
            "Glucosamine Joint Support",
            "Supports joint flexibility and mobility. Helps reduce joint pain and stiffness.",
            34.99,
            &["joint pain", "arthritis", "mobility", "joints", "flexibility", "inflammation"],
            "https://images.unsplash.com/photo-1587854692152-cbe660dbde88?w=400",
        ),
        sample(
            "Vitamin B Complex Energy Boost",
            "Increases energy levels and reduces fatigue. Supports metabolism and nervous system.",
            16.99,
            &["energy", "fatigue", "b vitamins", "metabolism", "nervous system", "tiredness"],
            "https://images.unsplash.com/photo-1607619056574-7b8d3ee536b2?w=400",
        ),
        sample(
            "Probiotic Digestive Health",
            "Supports gut health and digestive system. Contains 10 billion CFU per serving.",
            27.99,
            &["digestive health", "gut", "probiotics", "digestion", "stomach", "intestinal"],
            "https://images.unsplash.com/photo-1526406915894-7bcd65f60845?w=400",
        ),
        sample(
            "Immune System Booster",
            "Strengthens immune system with Vitamin C, Zinc, and Elderberry. Helps fight infections.",
            22.99,
            &["immunity", "immune system", "vitamin c", "zinc", "cold", "flu", "infection"],
            "https://images.unsplash.com/photo-1584017911766-d451b3d0e843?w=400",
        ),
        sample(
            "Sleep Support Melatonin",
            "Natural sleep aid with melatonin and calming herbs. Promotes restful sleep.",
            18.99,
            &["sleep", "insomnia", "melatonin", "rest", "relaxation", "sleep quality"],
            "https://images.unsplash.com/photo-1541781774459-bb2af2f05b55?w=400",
        ),
        sample(
            "Collagen Skin Health",
            "Promotes youthful skin, reduces wrinkles, and improves skin elasticity.",
            32.99,
            &["skin health", "collagen", "anti-aging", "wrinkles", "beauty", "elasticity"],
            "https://images.unsplash.com/photo-1556228578-0d85b1a4d571?w=400",
        ),
        sample(
            "Iron Supplement",
            "Prevents anemia and boosts energy. Essential for red blood cell production.",
            14.99,
            &["iron", "anemia", "energy", "blood", "fatigue", "hemoglobin"],
            "https://images.unsplash.com/photo-1471864190281-a93a3070b6de?w=400",
        ),
        sample(
            "Turmeric Curcumin",
            "Natural anti-inflammatory with powerful antioxidant properties.",
            21.99,
            &["inflammation", "turmeric", "antioxidant", "joint health", "pain relief", "natural"],
            "https://images.unsplash.com/photo-1615485500834-bc10199bc727?w=400",
        ),
        sample(
            "Magnesium Glycinate",
            "Supports muscle relaxation, sleep quality, and stress reduction.",
            19.99,
            &["magnesium", "sleep", "muscle", "stress", "relaxation", "cramps"],
            "https://images.unsplash.com/photo-1584308666744-24d5c474f2ae?w=400",
        ),
    ]
}

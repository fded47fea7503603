//! Keyword-driven product recommendation.
//!
//! Everything here is a pure function over in-memory lists: no I/O, no
//! shared state, and no failure modes. Empty input degrades to the
//! confidence floor and an empty recommendation list.

pub mod follow_up;
pub mod tables;

pub use follow_up::{FixedPicker, QuestionPicker, RandomPicker, follow_up_question};

use crate::storage::Product;
use crate::storage::products::title_key;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tables::{CATEGORY_MAP, DEFAULT_CATEGORY, RESPONSE_TAG_WHITELIST};

/// Upper bound on recommendations returned to a caller.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// What the matcher is asked to work from.
#[derive(Debug, Clone)]
pub enum MatchInput {
    /// Lowercase keywords extracted from user text.
    Keywords(Vec<String>),
    /// A free-form AI reply to scan for product mentions.
    ResponseText(String),
}

/// A product as presented in a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub image: String,
    pub description: String,
}

impl From<&Product> for RecommendedProduct {
    fn from(product: &Product) -> Self {
        Self {
            name: product.title.clone(),
            category: category_from_tags(product.tags.as_slice()).to_string(),
            price: product.price,
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub products: Vec<RecommendedProduct>,
    pub confidence: f64,
}

/// Run the matcher over `input` and cap the result.
pub fn recommend(input: &MatchInput, catalog: &[Product]) -> RecommendationResult {
    let (signal, matched) = match input {
        MatchInput::Keywords(keywords) => {
            let names = map_symptoms_to_products(keywords);
            (keywords.len(), find_matching_products(&names, catalog))
        }
        MatchInput::ResponseText(text) => {
            let terms = whitelist_terms_in(text);
            (terms.len(), match_response_text(text, catalog))
        }
    };

    let confidence = calculate_confidence(signal, matched.len());
    let products = matched
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|p| RecommendedProduct::from(*p))
        .collect();

    RecommendationResult {
        products,
        confidence,
    }
}

/// Collect the canonical product names for every known keyword.
pub fn map_symptoms_to_products(keywords: &[String]) -> HashSet<&'static str> {
    keywords
        .iter()
        .filter_map(|keyword| tables::symptom_products(keyword))
        .flat_map(|names| names.iter().copied())
        .collect()
}

/// Catalog products whose title and a canonical name contain one another.
///
/// Catalog order is preserved and a title is only returned once.
pub fn find_matching_products<'a>(
    names: &HashSet<&'static str>,
    catalog: &'a [Product],
) -> Vec<&'a Product> {
    if names.is_empty() {
        return Vec::new();
    }

    let names: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    let mut seen = HashSet::new();

    catalog
        .iter()
        .filter(|product| {
            let title = title_key(&product.title);
            !title.is_empty()
                && names
                    .iter()
                    .any(|name| title.contains(name.as_str()) || name.contains(title.as_str()))
        })
        .filter(|product| seen.insert(title_key(&product.title)))
        .collect()
}

/// Products mentioned by an AI reply, at most [`MAX_RECOMMENDATIONS`].
///
/// A product is mentioned when the reply contains its title, or one of its
/// tags is a whitelisted term that the reply also contains.
pub fn match_response_text<'a>(response: &str, catalog: &'a [Product]) -> Vec<&'a Product> {
    let response = response.to_lowercase();
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for product in catalog {
        if matches.len() == MAX_RECOMMENDATIONS {
            break;
        }

        let title = title_key(&product.title);
        if title.is_empty() {
            continue;
        }

        let by_title = response.contains(&title);
        let by_tag = || {
            product.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                RESPONSE_TAG_WHITELIST.contains(&tag.as_str()) && response.contains(&tag)
            })
        };

        if (by_title || by_tag()) && seen.insert(title) {
            matches.push(product);
        }
    }

    matches
}

fn whitelist_terms_in(response: &str) -> Vec<&'static str> {
    let response = response.to_lowercase();
    RESPONSE_TAG_WHITELIST
        .iter()
        .copied()
        .filter(|term| response.contains(term))
        .collect()
}

/// Display category for a tag list. First tag to hit the table wins.
pub fn category_from_tags<S: AsRef<str>>(tags: &[S]) -> &'static str {
    for tag in tags {
        let tag = tag.as_ref().to_lowercase();
        for &(key, category) in CATEGORY_MAP {
            if tag.contains(key) {
                return category;
            }
        }
    }
    DEFAULT_CATEGORY
}

/// Heuristic score from how many keywords and products were found.
pub fn calculate_confidence(keywords: usize, products: usize) -> f64 {
    if keywords == 0 {
        return 0.3;
    }
    if products == 0 {
        return 0.4;
    }

    let keyword_score = (keywords as f64 / 3.0).min(1.0) * 0.4;
    let product_score = (products as f64 / 3.0).min(1.0) * 0.6;

    ((keyword_score + product_score) * 100.0).round() / 100.0
}

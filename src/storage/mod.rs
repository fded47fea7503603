pub mod jsonl;
pub mod products;
pub mod records;

pub use jsonl::JsonlStorage;
pub use products::{CatalogError, Product, ProductRepository};
pub use records::{ChatMessageRecord, InputType, SymptomAnalysisRecord};

use crate::api::models::*;
use crate::storage::{CatalogError, Product};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::info;

pub async fn search_products_handler(
    State(state): State<AppState>,
    params: Result<Query<ProductSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Query(params) = params?;
    info!(query = %params.query, search_type = ?params.search_type, "Searching products");

    let products = state
        .products
        .search(&params.query, params.search_type)
        .await
        .map_err(|e| AppError::Internal(format!("Product search failed: {}", e)))?;

    info!(found = products.len(), "Search complete");
    Ok(Json(products))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let Json(product) = payload?;

    let created = state.products.create_product(product).map_err(|e| match e {
        CatalogError::Invalid(msg) => AppError::BadRequest(msg),
        e @ CatalogError::DuplicateTitle(_) => AppError::BadRequest(e.to_string()),
        CatalogError::Storage(e) => AppError::Internal(format!("Create product failed: {}", e)),
    })?;

    info!(title = %created.title, "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn seed_products_handler(
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, AppError> {
    let count = state
        .products
        .seed_products()
        .map_err(|e| AppError::Internal(format!("Seeding failed: {}", e)))?;

    Ok(Json(SeedResponse {
        message: "Sample products seeded successfully".to_string(),
        count,
    }))
}

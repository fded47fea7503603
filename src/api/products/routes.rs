use crate::api::models::AppState;
use crate::api::products::handlers::{
    create_product_handler, search_products_handler, seed_products_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(search_products_handler).post(create_product_handler),
        )
        .route("/products/seed", post(seed_products_handler))
}

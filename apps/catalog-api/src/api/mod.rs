//! API routes
//!
//! Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod categories;
pub mod health;
pub mod product_images;
pub mod products;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/category", categories::router(state))
        .nest("/products", products::router(state))
        .nest("/product-images", product_images::router(state))
}

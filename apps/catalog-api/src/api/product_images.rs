use axum::Router;
use domain_catalog::{PgProductImageRepository, ProductImageService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgProductImageRepository::new(state.db.clone());
    handlers::product_image_router(ProductImageService::new(repository))
}

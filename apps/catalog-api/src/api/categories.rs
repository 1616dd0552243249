use axum::Router;
use domain_catalog::{CategoryService, PgCategoryRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgCategoryRepository::new(state.db.clone());
    handlers::category_router(CategoryService::new(repository))
}

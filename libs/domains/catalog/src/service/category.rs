use std::sync::Arc;

use super::{parse_id, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, PageParams, PageRequest, Paginated, UpdateCategory,
};
use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a category; a taken slug surfaces as `DuplicateSlug` from storage
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        validate(&input)?;
        self.repository.create(input).await
    }

    pub async fn list_categories(&self, params: PageParams) -> CatalogResult<Paginated<Category>> {
        let request = PageRequest::from(params);
        let (data, total) = tokio::try_join!(
            self.repository.fetch(request.limit, request.offset()),
            self.repository.fetch_count(),
        )?;
        Ok(Paginated::new(data, total, request))
    }

    pub async fn get_category(&self, id: &str) -> CatalogResult<Category> {
        let id = parse_id(id, "category")?;
        self.repository
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("category", id))
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> CatalogResult<Category> {
        if slug.trim().is_empty() {
            return Err(CatalogError::Validation("slug must not be empty".to_string()));
        }
        self.repository
            .fetch_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::not_found("category", slug))
    }

    pub async fn update_category(
        &self,
        id: &str,
        input: UpdateCategory,
    ) -> CatalogResult<Category> {
        let id = parse_id(id, "category")?;
        validate(&input)?;
        self.repository
            .update(id, input)
            .await?
            .ok_or_else(|| CatalogError::not_found("category", id))
    }

    pub async fn delete_category(&self, id: &str) -> CatalogResult<()> {
        let id = parse_id(id, "category")?;
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("category", id));
        }
        Ok(())
    }
}

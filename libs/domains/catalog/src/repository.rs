use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Category, CreateCategory, NewProduct, NewProductImage, Product, ProductChanges, ProductImage,
    UpdateCategory,
};

/// Category persistence. Slug uniqueness is left to storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category>;

    /// Categories ordered by name
    async fn fetch(&self, limit: u64, offset: u64) -> CatalogResult<Vec<Category>>;

    async fn fetch_count(&self) -> CatalogResult<u64>;

    async fn fetch_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    async fn fetch_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>>;

    /// Returns `None` when no category has this id
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Option<Category>>;

    /// Returns `false` when no category has this id
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;
}

/// Product persistence with association management.
///
/// Every read returns the aggregate (categories and primary image URL
/// populated). Writes that touch several rows are atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert the product and one association row per category id
    async fn create(&self, input: NewProduct) -> CatalogResult<Product>;

    /// Products ordered newest first
    async fn fetch(&self, limit: u64, offset: u64) -> CatalogResult<Vec<Product>>;

    async fn fetch_count(&self) -> CatalogResult<u64>;

    async fn fetch_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    async fn fetch_by_category(&self, category_id: Uuid) -> CatalogResult<Vec<Product>>;

    /// Update scalar fields and, when `changes.category_ids` is non-empty,
    /// replace the association set. Returns `None` for an unknown id.
    async fn update(&self, id: Uuid, changes: ProductChanges) -> CatalogResult<Option<Product>>;

    /// Associations and images go with the product
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;
}

/// Product image persistence. At most one image per product is primary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductImageRepository: Send + Sync {
    /// Insert an image; a primary one demotes the current primary
    async fn create(&self, input: NewProductImage) -> CatalogResult<ProductImage>;

    /// Images of a product, oldest first
    async fn get_by_product_id(&self, product_id: Uuid) -> CatalogResult<Vec<ProductImage>>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Make `image_id` the only primary image of `product_id`.
    ///
    /// Fails with `NotFound` when the product does not exist or the image
    /// does not belong to it.
    async fn set_primary(&self, product_id: Uuid, image_id: Uuid) -> CatalogResult<ProductImage>;
}

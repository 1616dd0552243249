use std::sync::Arc;

use super::{parse_id, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{AddProductImage, NewProductImage, ProductImage};
use crate::repository::ProductImageRepository;

#[derive(Clone)]
pub struct ProductImageService<R: ProductImageRepository> {
    repository: Arc<R>,
}

impl<R: ProductImageRepository> ProductImageService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Attach an image to a product. A primary image replaces the current one.
    pub async fn add_image(&self, input: AddProductImage) -> CatalogResult<ProductImage> {
        validate(&input)?;
        let product_id = parse_id(&input.product_id, "product")?;

        self.repository
            .create(NewProductImage {
                product_id,
                url: input.url,
                is_primary: input.is_primary,
            })
            .await
    }

    pub async fn list_images(&self, product_id: &str) -> CatalogResult<Vec<ProductImage>> {
        let product_id = parse_id(product_id, "product")?;
        self.repository.get_by_product_id(product_id).await
    }

    pub async fn delete_image(&self, id: &str) -> CatalogResult<()> {
        let id = parse_id(id, "image")?;
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("product image", id));
        }
        Ok(())
    }

    pub async fn set_primary(&self, product_id: &str, image_id: &str) -> CatalogResult<ProductImage> {
        let product_id = parse_id(product_id, "product")?;
        let image_id = parse_id(image_id, "image")?;
        self.repository.set_primary(product_id, image_id).await
    }
}

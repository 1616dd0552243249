use std::sync::Arc;
use uuid::Uuid;

use super::{parse_id, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, NewProduct, PageParams, PageRequest, Paginated, Product, ProductChanges,
    UpdateProduct,
};
use crate::repository::ProductRepository;

#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

fn parse_category_ids(raw: &[String]) -> CatalogResult<Vec<Uuid>> {
    raw.iter().map(|id| parse_id(id, "category")).collect()
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a product together with its category associations.
    ///
    /// Every category id must be a UUID; ids that do not reference a
    /// category fail with `UnknownCategory` and nothing is written.
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        validate(&input)?;
        let category_ids = parse_category_ids(&input.category_ids)?;

        self.repository
            .create(NewProduct {
                name: input.name,
                slug: input.slug,
                description: input.description,
                price: input.price,
                category_ids,
            })
            .await
    }

    pub async fn list_products(&self, params: PageParams) -> CatalogResult<Paginated<Product>> {
        let request = PageRequest::from(params);
        let (data, total) = tokio::try_join!(
            self.repository.fetch(request.limit, request.offset()),
            self.repository.fetch_count(),
        )?;
        Ok(Paginated::new(data, total, request))
    }

    pub async fn get_product(&self, id: &str) -> CatalogResult<Product> {
        let id = parse_id(id, "product")?;
        self.repository
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("product", id))
    }

    pub async fn list_products_by_category(&self, category_id: &str) -> CatalogResult<Vec<Product>> {
        let category_id = parse_id(category_id, "category")?;
        self.repository.fetch_by_category(category_id).await
    }

    /// Partial update. Categories are replaced only when a non-empty list
    /// is supplied.
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> CatalogResult<Product> {
        let id = parse_id(id, "product")?;
        validate(&input)?;
        let category_ids = parse_category_ids(&input.category_ids)?;

        self.repository
            .update(
                id,
                ProductChanges {
                    name: input.name,
                    slug: input.slug,
                    description: input.description,
                    price: input.price,
                    category_ids,
                },
            )
            .await?
            .ok_or_else(|| CatalogError::not_found("product", id))
    }

    pub async fn delete_product(&self, id: &str) -> CatalogResult<()> {
        let id = parse_id(id, "product")?;
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("product", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use chrono::Utc;
    use mockall::predicate::{always, eq};

    fn product(id: Uuid) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: "Go 101".into(),
            slug: "go-101".into(),
            description: String::new(),
            price: 9.99,
            primary_image_url: String::new(),
            categories: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input(category_ids: Vec<String>) -> CreateProduct {
        CreateProduct {
            name: "Go 101".into(),
            slug: "go-101".into(),
            description: String::new(),
            price: 9.99,
            category_ids,
        }
    }

    #[tokio::test]
    async fn test_create_requires_a_category() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service.create_product(create_input(vec![])).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_category_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .create_product(create_input(vec!["books".into()]))
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(msg)) if msg.contains("category id")));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let mut input = create_input(vec![Uuid::now_v7().to_string()]);
        input.price = -0.01;

        let result = service.create_product(input).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_passes_parsed_ids() {
        let category_id = Uuid::now_v7();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .withf(move |input| input.category_ids == vec![category_id] && input.slug == "go-101")
            .times(1)
            .returning(|_| Ok(product(Uuid::now_v7())));

        let service = ProductService::new(mock_repo);
        let created = service
            .create_product(create_input(vec![category_id.to_string()]))
            .await
            .unwrap();

        assert_eq!(created.slug, "go-101");
    }

    #[tokio::test]
    async fn test_update_with_empty_categories_keeps_them() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .with(
                eq(id),
                eq(ProductChanges {
                    price: Some(12.5),
                    ..Default::default()
                }),
            )
            .returning(move |_, _| Ok(Some(product(id))));

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(
                &id.to_string(),
                UpdateProduct {
                    price: Some(12.5),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .with(always(), always())
            .returning(|_, _| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(&Uuid::now_v7().to_string(), UpdateProduct::default())
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::NotFound { entity: "product", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_empty_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(
                &Uuid::now_v7().to_string(),
                UpdateProduct {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_uses_offset_from_page() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_fetch()
            .with(eq(20u64), eq(40u64))
            .returning(|_, _| Ok(vec![]));
        mock_repo.expect_fetch_count().returning(|| Ok(41));

        let service = ProductService::new(mock_repo);
        let page = service
            .list_products(PageParams {
                page: Some(3),
                limit: Some(20),
            })
            .await
            .unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
    }

    #[tokio::test]
    async fn test_storage_errors_pass_through() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_fetch_by_category()
            .returning(|_| Err(CatalogError::Database("connection reset".into())));

        let service = ProductService::new(mock_repo);
        let result = service
            .list_products_by_category(&Uuid::now_v7().to_string())
            .await;

        assert!(matches!(result, Err(CatalogError::Database(_))));
    }
}

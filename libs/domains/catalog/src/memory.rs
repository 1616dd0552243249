//! In-memory repositories for tests and local runs without Postgres.
//!
//! The three repositories share one store behind a single lock, so
//! referential rules (unknown categories, cascades, one primary image) hold
//! the same way they do in the database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, NewProduct, NewProductImage, Product, ProductChanges, ProductImage,
    UpdateCategory,
};
use crate::repository::{CategoryRepository, ProductImageRepository, ProductRepository};

/// Stored product row, without the derived aggregate fields
#[derive(Debug, Clone)]
struct ProductRecord {
    product: Product,
    category_ids: BTreeSet<Uuid>,
}

#[derive(Debug, Default)]
struct Store {
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, ProductRecord>,
    images: HashMap<Uuid, ProductImage>,
}

impl Store {
    fn category_slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.categories
            .values()
            .any(|c| c.slug == slug && Some(c.id) != except)
    }

    fn product_slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.products
            .values()
            .any(|p| p.product.slug == slug && Some(p.product.id) != except)
    }

    fn check_categories(&self, ids: &[Uuid]) -> CatalogResult<()> {
        match ids.iter().find(|id| !self.categories.contains_key(id)) {
            Some(missing) => Err(CatalogError::UnknownCategory(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Build the aggregate view of a stored product
    fn aggregate(&self, record: &ProductRecord) -> Product {
        let mut categories: Vec<Category> = record
            .category_ids
            .iter()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        let primary_image_url = self
            .images
            .values()
            .find(|img| img.product_id == record.product.id && img.is_primary)
            .map(|img| img.url.clone())
            .unwrap_or_default();

        Product {
            categories,
            primary_image_url,
            ..record.product.clone()
        }
    }

    /// Products newest first, ties broken by id
    fn sorted_products(&self) -> Vec<&ProductRecord> {
        let mut records: Vec<&ProductRecord> = self.products.values().collect();
        records.sort_by(|a, b| {
            b.product
                .created_at
                .cmp(&a.product.created_at)
                .then(b.product.id.cmp(&a.product.id))
        });
        records
    }

    fn clear_primary(&mut self, product_id: Uuid) {
        for image in self.images.values_mut() {
            if image.product_id == product_id {
                image.is_primary = false;
            }
        }
    }
}

/// Shared in-memory catalog; hand out repositories with
/// [`categories`](Self::categories), [`products`](Self::products) and
/// [`images`](Self::images).
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    store: Arc<RwLock<Store>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            store: self.store.clone(),
        }
    }

    pub fn products(&self) -> InMemoryProductRepository {
        InMemoryProductRepository {
            store: self.store.clone(),
        }
    }

    pub fn images(&self) -> InMemoryProductImageRepository {
        InMemoryProductImageRepository {
            store: self.store.clone(),
        }
    }
}

#[derive(Clone)]
pub struct InMemoryCategoryRepository {
    store: Arc<RwLock<Store>>,
}

#[derive(Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

#[derive(Clone)]
pub struct InMemoryProductImageRepository {
    store: Arc<RwLock<Store>>,
}

fn page<T>(items: impl Iterator<Item = T>, limit: u64, offset: u64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    items.skip(offset).take(limit).collect()
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let mut store = self.store.write().await;

        if store.category_slug_taken(&input.slug, None) {
            return Err(CatalogError::DuplicateSlug {
                entity: "category",
                slug: input.slug,
            });
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            created_at: now,
            updated_at: now,
        };
        store.categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn fetch(&self, limit: u64, offset: u64) -> CatalogResult<Vec<Category>> {
        let store = self.store.read().await;
        let mut categories: Vec<Category> = store.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(page(categories.into_iter(), limit, offset))
    }

    async fn fetch_count(&self) -> CatalogResult<u64> {
        Ok(self.store.read().await.categories.len() as u64)
    }

    async fn fetch_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        Ok(self.store.read().await.categories.get(&id).cloned())
    }

    async fn fetch_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>> {
        let store = self.store.read().await;
        Ok(store.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Option<Category>> {
        let mut store = self.store.write().await;

        if let Some(slug) = &input.slug
            && store.category_slug_taken(slug, Some(id))
        {
            return Err(CatalogError::DuplicateSlug {
                entity: "category",
                slug: slug.clone(),
            });
        }

        let Some(category) = store.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            category.name = name;
        }
        if let Some(slug) = input.slug {
            category.slug = slug;
        }
        category.updated_at = Utc::now();

        tracing::info!(category_id = %id, "Updated category");
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut store = self.store.write().await;

        if store.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for record in store.products.values_mut() {
            record.category_ids.remove(&id);
        }

        tracing::info!(category_id = %id, "Deleted category");
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut store = self.store.write().await;

        if store.product_slug_taken(&input.slug, None) {
            return Err(CatalogError::DuplicateSlug {
                entity: "product",
                slug: input.slug,
            });
        }
        store.check_categories(&input.category_ids)?;

        let now = Utc::now();
        let record = ProductRecord {
            product: Product {
                id: Uuid::now_v7(),
                name: input.name,
                slug: input.slug,
                description: input.description,
                price: input.price,
                primary_image_url: String::new(),
                categories: Vec::new(),
                created_at: now,
                updated_at: now,
            },
            category_ids: input.category_ids.into_iter().collect(),
        };
        let id = record.product.id;
        let product = store.aggregate(&record);
        store.products.insert(id, record);

        tracing::info!(product_id = %id, "Created product");
        Ok(product)
    }

    async fn fetch(&self, limit: u64, offset: u64) -> CatalogResult<Vec<Product>> {
        let store = self.store.read().await;
        let records = store.sorted_products();
        Ok(page(
            records.into_iter().map(|r| store.aggregate(r)),
            limit,
            offset,
        ))
    }

    async fn fetch_count(&self) -> CatalogResult<u64> {
        Ok(self.store.read().await.products.len() as u64)
    }

    async fn fetch_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).map(|r| store.aggregate(r)))
    }

    async fn fetch_by_category(&self, category_id: Uuid) -> CatalogResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store
            .sorted_products()
            .into_iter()
            .filter(|r| r.category_ids.contains(&category_id))
            .map(|r| store.aggregate(r))
            .collect())
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> CatalogResult<Option<Product>> {
        let mut store = self.store.write().await;

        if !store.products.contains_key(&id) {
            return Ok(None);
        }
        if let Some(slug) = &changes.slug
            && store.product_slug_taken(slug, Some(id))
        {
            return Err(CatalogError::DuplicateSlug {
                entity: "product",
                slug: slug.clone(),
            });
        }
        store.check_categories(&changes.category_ids)?;

        let Some(record) = store.products.get_mut(&id) else {
            return Ok(None);
        };
        let product = &mut record.product;
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(slug) = changes.slug {
            product.slug = slug;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        product.updated_at = Utc::now();
        if !changes.category_ids.is_empty() {
            record.category_ids = changes.category_ids.into_iter().collect();
        }

        let record = record.clone();
        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(store.aggregate(&record)))
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_none() {
            return Ok(false);
        }
        store.images.retain(|_, img| img.product_id != id);

        tracing::info!(product_id = %id, "Deleted product");
        Ok(true)
    }
}

#[async_trait]
impl ProductImageRepository for InMemoryProductImageRepository {
    async fn create(&self, input: NewProductImage) -> CatalogResult<ProductImage> {
        let mut store = self.store.write().await;

        if !store.products.contains_key(&input.product_id) {
            return Err(CatalogError::not_found("product", input.product_id));
        }
        if input.is_primary {
            store.clear_primary(input.product_id);
        }

        let image = ProductImage {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            url: input.url,
            is_primary: input.is_primary,
            created_at: Utc::now(),
        };
        store.images.insert(image.id, image.clone());

        tracing::info!(image_id = %image.id, product_id = %image.product_id, "Added product image");
        Ok(image)
    }

    async fn get_by_product_id(&self, product_id: Uuid) -> CatalogResult<Vec<ProductImage>> {
        let store = self.store.read().await;
        let mut images: Vec<ProductImage> = store
            .images
            .values()
            .filter(|img| img.product_id == product_id)
            .cloned()
            .collect();
        images.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(images)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let removed = self.store.write().await.images.remove(&id).is_some();
        if removed {
            tracing::info!(image_id = %id, "Deleted product image");
        }
        Ok(removed)
    }

    async fn set_primary(&self, product_id: Uuid, image_id: Uuid) -> CatalogResult<ProductImage> {
        let mut store = self.store.write().await;

        if !store.products.contains_key(&product_id) {
            return Err(CatalogError::not_found("product", product_id));
        }
        let belongs = store
            .images
            .get(&image_id)
            .is_some_and(|img| img.product_id == product_id);
        if !belongs {
            return Err(CatalogError::not_found("product image", image_id));
        }

        store.clear_primary(product_id);
        let Some(image) = store.images.get_mut(&image_id) else {
            return Err(CatalogError::not_found("product image", image_id));
        };
        image.is_primary = true;

        tracing::info!(image_id = %image_id, product_id = %product_id, "Set primary product image");
        Ok(image.clone())
    }
}

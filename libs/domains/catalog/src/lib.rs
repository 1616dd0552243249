//! Catalog Domain
//!
//! Products, categories and product images, with the product-category
//! association kept consistent across writes and a single aggregate read
//! that returns a product with its categories and primary image URL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routers + OpenAPI docs
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← id parsing, validation, pagination
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← traits; Postgres (transactional) and in-memory
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Mapper    │  ← aggregate row → Product
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers, CategoryService, InMemoryCatalog, ProductImageService, ProductService,
//! };
//!
//! let catalog = InMemoryCatalog::new();
//!
//! let api = axum::Router::new()
//!     .nest("/category", handlers::category_router(CategoryService::new(catalog.categories())))
//!     .nest("/products", handlers::product_router(ProductService::new(catalog.products())))
//!     .nest(
//!         "/product-images",
//!         handlers::product_image_router(ProductImageService::new(catalog.images())),
//!     );
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use memory::{
    InMemoryCatalog, InMemoryCategoryRepository, InMemoryProductImageRepository,
    InMemoryProductRepository,
};
pub use models::{
    AddProductImage, Category, CreateCategory, CreateProduct, NewProduct, NewProductImage,
    PageParams, PageRequest, Paginated, Product, ProductChanges, ProductImage, UpdateCategory,
    UpdateProduct,
};
pub use postgres::{PgCategoryRepository, PgProductImageRepository, PgProductRepository};
pub use repository::{CategoryRepository, ProductImageRepository, ProductRepository};
pub use service::{CategoryService, ProductImageService, ProductService};

//! HTTP handlers, one router and OpenAPI document per resource.
//!
//! Routers use paths relative to their mount point; the application nests
//! them (e.g. `/category`, `/products`, `/product-images` under `/api`).

pub mod category;
pub mod product;
pub mod product_image;

pub use category::{ApiDoc as CategoryApiDoc, router as category_router};
pub use product::{ApiDoc as ProductApiDoc, router as product_router};
pub use product_image::{ApiDoc as ProductImageApiDoc, router as product_image_router};

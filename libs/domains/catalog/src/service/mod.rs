//! Use case layer.
//!
//! Services accept primitive input straight from the transport (string ids,
//! raw page numbers), validate it, and only then call a repository.
//! Repository errors pass through unchanged.

mod category;
mod product;
mod product_image;

pub use category::CategoryService;
pub use product::ProductService;
pub use product_image::ProductImageService;

use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};

fn parse_id(raw: &str, what: &str) -> CatalogResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CatalogError::Validation(format!("invalid {what} id '{raw}'")))
}

fn validate<T: Validate>(input: &T) -> CatalogResult<()> {
    input
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))
}

//! SeaORM entities for the catalog tables.
//!
//! Writes go through these; aggregate reads use raw SQL (see [`crate::mapper`]).

pub mod category;
pub mod product;
pub mod product_category;
pub mod product_image;

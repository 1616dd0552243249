//! Row → entity mapping for the product aggregate read.
//!
//! The aggregate query returns one row per product with the primary image
//! URL as a nullable column and the categories as a JSON array rendered to
//! text. Decoding is total: a missing image becomes an empty string and an
//! absent or malformed category array becomes an empty list.

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use uuid::Uuid;

use crate::models::{Category, Product};

#[derive(Debug, Clone, FromQueryResult)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub primary_image_url: Option<String>,
    pub categories: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let categories = decode_categories(row.id, row.categories.as_deref());

        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            primary_image_url: row.primary_image_url.unwrap_or_default(),
            categories,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Decode the `json_agg` category column.
///
/// Never fails. Malformed data is logged and read as "no categories" so the
/// product itself stays readable.
pub fn decode_categories(product_id: Uuid, raw: Option<&str>) -> Vec<Category> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Option<Vec<Category>>>(raw) {
        Ok(categories) => categories.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(
                product_id = %product_id,
                error = %e,
                "Discarding malformed category aggregate"
            );
            Vec::new()
        }
    }
}

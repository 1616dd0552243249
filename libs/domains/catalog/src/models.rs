use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Lowercase words joined by single hyphens, e.g. `go-101`
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if !SLUG.is_match(slug) {
        return Err(validator::ValidationError::new("invalid_slug"));
    }
    Ok(())
}

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

// ----------------------------------------------------------------------------
// Entities
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate read-model: a product with its categories and primary image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    /// URL of the primary image, empty when the product has none
    pub primary_image_url: String,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

// ----------------------------------------------------------------------------
// Request DTOs
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Category ids as UUID strings; at least one is required
    #[validate(length(min = 1))]
    pub category_ids: Vec<String>,
}

/// Partial product update. An empty `category_ids` keeps the current
/// categories; a non-empty one replaces them.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddProductImage {
    pub product_id: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

// ----------------------------------------------------------------------------
// Repository inputs (identifiers already parsed)
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// Empty means leave the association set untouched
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProductImage {
    pub product_id: Uuid,
    pub url: String,
    pub is_primary: bool,
}

// ----------------------------------------------------------------------------
// Pagination
// ----------------------------------------------------------------------------

/// Raw `?page=&limit=` query values, before clamping
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number (values below 1 are treated as 1)
    pub page: Option<i64>,
    /// Page size, 1..=100 (default 10)
    pub limit: Option<i64>,
}

/// A normalized page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Rows to skip; never exceeds `i64::MAX` so it binds as a SQL `BIGINT`.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        let limit = match params.limit {
            Some(l) if l > 0 => (l as u64).min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        // Past this page the offset would no longer fit in a BIGINT
        let last_page = i64::MAX as u64 / limit + 1;
        let page = params
            .page
            .filter(|p| *p > 0)
            .map_or(1, |p| (p as u64).min(last_page));
        Self { page, limit }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PageRequest {
        PageParams { page, limit }.into()
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(params(None, None), PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(params(Some(0), Some(-5)), PageRequest { page: 1, limit: 10 });
        assert_eq!(params(Some(-3), Some(0)), PageRequest { page: 1, limit: 10 });
        assert_eq!(params(Some(2), Some(500)), PageRequest { page: 2, limit: 100 });
    }

    #[test]
    fn test_offset() {
        assert_eq!(params(Some(1), Some(10)).offset(), 0);
        assert_eq!(params(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_huge_page_keeps_offset_in_bigint_range() {
        for limit in [2, 100] {
            let request = params(Some(i64::MAX), Some(limit));
            let offset = request.offset();

            assert!(offset <= i64::MAX as u64, "limit {limit}: offset {offset}");
            assert!(i64::try_from(offset).is_ok());
            assert!(request.page >= 1);
        }

        let request = PageRequest {
            page: u64::MAX,
            limit: 100,
        };
        assert_eq!(request.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest { page: 1, limit: 10 };
        assert_eq!(Paginated::<()>::new(vec![], 0, request).total_pages, 0);
        assert_eq!(Paginated::<()>::new(vec![], 10, request).total_pages, 1);
        assert_eq!(Paginated::<()>::new(vec![], 11, request).total_pages, 2);
    }

    #[test]
    fn test_slug_format() {
        assert!(validate_slug("go-101").is_ok());
        assert!(validate_slug("books").is_ok());
        assert!(validate_slug("Go-101").is_err());
        assert!(validate_slug("go--101").is_err());
        assert!(validate_slug("-books").is_err());
        assert!(validate_slug("books and more").is_err());
    }

    #[test]
    fn test_create_product_validation() {
        let input = CreateProduct {
            name: "Go 101".into(),
            slug: "go-101".into(),
            description: String::new(),
            price: -1.0,
            category_ids: vec![],
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("category_ids"));
    }

    #[test]
    fn test_update_product_accepts_capitalized_description() {
        let input: UpdateProduct =
            serde_json::from_str(r#"{"Description": "A gentle introduction"}"#).unwrap();
        assert_eq!(input.description.as_deref(), Some("A gentle introduction"));
        assert!(input.category_ids.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_category_rejects_empty_name() {
        let input = UpdateCategory {
            name: Some(String::new()),
            slug: None,
        };
        assert!(input.validate().is_err());
    }
}

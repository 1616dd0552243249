use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} with slug '{slug}' already exists")]
    DuplicateSlug { entity: &'static str, slug: String },

    #[error("category '{0}' does not exist")]
    UnknownCategory(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        CatalogError::Database(err.to_string())
    }
}

/// What a failed write was touching, so constraint violations can be
/// reported in domain terms.
#[derive(Debug, Clone, Copy)]
pub(crate) enum WriteTarget<'a> {
    Category { slug: &'a str },
    Product {
        slug: &'a str,
        category_ids: &'a [uuid::Uuid],
    },
    ProductImage { product_id: &'a str },
}

/// Classify a storage error raised by a write.
///
/// Unique violations map to `DuplicateSlug` for categories and products.
/// Product writes check their category ids up front, so a foreign-key
/// violation there is only a backstop; it becomes `UnknownCategory` naming
/// the supplied ids. On image writes it means the owning product is gone.
pub(crate) fn classify_write_error(err: DbErr, target: WriteTarget<'_>) -> CatalogError {
    match (err.sql_err(), target) {
        (Some(SqlErr::UniqueConstraintViolation(_)), WriteTarget::Category { slug }) => {
            CatalogError::DuplicateSlug {
                entity: "category",
                slug: slug.to_string(),
            }
        }
        (Some(SqlErr::UniqueConstraintViolation(_)), WriteTarget::Product { slug, .. }) => {
            CatalogError::DuplicateSlug {
                entity: "product",
                slug: slug.to_string(),
            }
        }
        (
            Some(SqlErr::ForeignKeyConstraintViolation(_)),
            WriteTarget::Product { category_ids, .. },
        ) => CatalogError::UnknownCategory(
            category_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        (
            Some(SqlErr::ForeignKeyConstraintViolation(_)),
            WriteTarget::ProductImage { product_id },
        ) => CatalogError::not_found("product", product_id),
        _ => CatalogError::Database(err.to_string()),
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            e @ CatalogError::NotFound { .. } => AppError::NotFound(e.to_string()),
            e @ CatalogError::DuplicateSlug { .. } => AppError::Conflict(e.to_string()),
            e @ CatalogError::UnknownCategory(_) => AppError::UnprocessableEntity(e.to_string()),
            CatalogError::Database(detail) => AppError::Database(detail),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CatalogError::not_found("product", "abc"), StatusCode::NOT_FOUND),
            (
                CatalogError::DuplicateSlug {
                    entity: "category",
                    slug: "books".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                CatalogError::UnknownCategory("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CatalogError::Database("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status(), expected);
        }
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = CatalogError::not_found("category", "books");
        assert_eq!(err.to_string(), "category 'books' not found");
    }

    #[test]
    fn test_unclassified_error_stays_database() {
        let err = classify_write_error(
            DbErr::Custom("boom".into()),
            WriteTarget::Category { slug: "books" },
        );
        assert!(matches!(err, CatalogError::Database(_)));
    }
}

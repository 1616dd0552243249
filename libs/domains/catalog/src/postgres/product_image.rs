use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::{begin, lock_product};
use crate::entity::product_image;
use crate::error::{CatalogError, CatalogResult, WriteTarget, classify_write_error};
use crate::models::{NewProductImage, ProductImage};
use crate::repository::ProductImageRepository;

#[derive(Clone)]
pub struct PgProductImageRepository {
    db: DatabaseConnection,
}

impl PgProductImageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unset the primary flag on every image of `product_id` except `keep`.
///
/// Must run before the new primary is flagged: the partial unique index on
/// `(product_id) WHERE is_primary` is checked per statement.
async fn clear_primary(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    keep: Option<Uuid>,
) -> Result<u64, DbErr> {
    let mut update = product_image::Entity::update_many()
        .col_expr(product_image::Column::IsPrimary, Expr::value(false).into())
        .filter(product_image::Column::ProductId.eq(product_id))
        .filter(product_image::Column::IsPrimary.eq(true));
    if let Some(keep) = keep {
        update = update.filter(product_image::Column::Id.ne(keep));
    }
    Ok(update.exec(txn).await?.rows_affected)
}

#[async_trait]
impl ProductImageRepository for PgProductImageRepository {
    async fn create(&self, input: NewProductImage) -> CatalogResult<ProductImage> {
        let product_key = input.product_id.to_string();
        let classify = |e| {
            classify_write_error(
                e,
                WriteTarget::ProductImage {
                    product_id: &product_key,
                },
            )
        };

        let txn = begin(&self.db).await?;

        if input.is_primary {
            if !lock_product(&txn, input.product_id).await? {
                return Err(CatalogError::not_found("product", input.product_id));
            }
            clear_primary(&txn, input.product_id, None).await?;
        }

        let model = product_image::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(input.product_id),
            url: Set(input.url),
            is_primary: Set(input.is_primary),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(classify)?;

        txn.commit().await?;
        tracing::info!(
            image_id = %model.id,
            product_id = %model.product_id,
            is_primary = model.is_primary,
            "Added product image"
        );
        Ok(model.into())
    }

    async fn get_by_product_id(&self, product_id: Uuid) -> CatalogResult<Vec<ProductImage>> {
        let models = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_asc(product_image::Column::CreatedAt)
            .order_by_asc(product_image::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = product_image::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(image_id = %id, "Deleted product image");
        }
        Ok(result.rows_affected > 0)
    }

    async fn set_primary(&self, product_id: Uuid, image_id: Uuid) -> CatalogResult<ProductImage> {
        let txn = begin(&self.db).await?;

        if !lock_product(&txn, product_id).await? {
            return Err(CatalogError::not_found("product", product_id));
        }

        let demoted = clear_primary(&txn, product_id, Some(image_id)).await?;

        let promoted = product_image::Entity::update_many()
            .col_expr(product_image::Column::IsPrimary, Expr::value(true).into())
            .filter(product_image::Column::Id.eq(image_id))
            .filter(product_image::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;
        if promoted.rows_affected == 0 {
            txn.rollback().await?;
            return Err(CatalogError::not_found("product image", image_id));
        }

        let model = product_image::Entity::find_by_id(image_id)
            .one(&txn)
            .await?
            .ok_or_else(|| CatalogError::not_found("product image", image_id))?;

        txn.commit().await?;
        tracing::info!(
            image_id = %image_id,
            product_id = %product_id,
            demoted,
            "Set primary product image"
        );
        Ok(model.into())
    }
}

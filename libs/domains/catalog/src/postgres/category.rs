use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity::category;
use crate::error::{CatalogResult, WriteTarget, classify_write_error};
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let now = Utc::now();
        let model = category::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            slug: Set(input.slug.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| classify_write_error(e, WriteTarget::Category { slug: &input.slug }))?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn fetch(&self, limit: u64, offset: u64) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn fetch_count(&self) -> CatalogResult<u64> {
        Ok(category::Entity::find().count(&self.db).await?)
    }

    async fn fetch_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn fetch_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Option<Category>> {
        let slug = input.slug.clone().unwrap_or_default();

        let mut update = category::Entity::update_many()
            .col_expr(category::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(category::Column::Id.eq(id));
        if let Some(name) = input.name {
            update = update.col_expr(category::Column::Name, Expr::value(name).into());
        }
        if let Some(new_slug) = input.slug {
            update = update.col_expr(category::Column::Slug, Expr::value(new_slug).into());
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| classify_write_error(e, WriteTarget::Category { slug: &slug }))?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        tracing::info!(category_id = %id, "Updated category");
        self.fetch_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = category::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(result.rows_affected > 0)
    }
}

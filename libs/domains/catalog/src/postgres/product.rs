use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect, Statement, Value,
};
use uuid::Uuid;

use super::begin;
use crate::entity::{category, product, product_category};
use crate::error::{CatalogError, CatalogResult, WriteTarget, classify_write_error};
use crate::mapper::ProductRow;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::repository::ProductRepository;

/// One row per product: scalar columns, the primary image URL and the
/// categories folded into a JSON array ordered by name.
const AGGREGATE_SELECT: &str = r#"
SELECT p.id, p.name, p.slug, p.description, p.price,
       (SELECT pi.url
          FROM product_images pi
         WHERE pi.product_id = p.id AND pi.is_primary
         LIMIT 1) AS primary_image_url,
       (SELECT json_agg(
                   json_build_object(
                       'id', c.id,
                       'name', c.name,
                       'slug', c.slug,
                       'created_at', c.created_at,
                       'updated_at', c.updated_at)
                   ORDER BY c.name, c.id)
          FROM product_categories pc
          JOIN categories c ON c.id = pc.category_id
         WHERE pc.product_id = p.id)::text AS categories,
       p.created_at, p.updated_at
  FROM products p
"#;

const NEWEST_FIRST: &str = "ORDER BY p.created_at DESC, p.id DESC";

#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn query_aggregate(
        &self,
        tail: &str,
        values: Vec<Value>,
    ) -> CatalogResult<Vec<Product>> {
        let sql = format!("{AGGREGATE_SELECT} {tail}");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);

        let rows = ProductRow::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Drop repeated ids, keeping first occurrence order
fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// Share-lock the referenced categories and report the first supplied id
/// that has no row. The lock holds off a concurrent category delete until
/// the association rows are committed.
async fn ensure_categories_exist(
    txn: &DatabaseTransaction,
    category_ids: &[Uuid],
) -> CatalogResult<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let found: Vec<Uuid> = category::Entity::find()
        .select_only()
        .column(category::Column::Id)
        .filter(category::Column::Id.is_in(category_ids.iter().copied()))
        .lock_shared()
        .into_tuple()
        .all(txn)
        .await?;

    match category_ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(CatalogError::UnknownCategory(missing.to_string())),
        None => Ok(()),
    }
}

async fn insert_associations(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), DbErr> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows = category_ids
        .iter()
        .map(|&category_id| product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category_id),
        });
    product_category::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let category_ids = dedup(input.category_ids);
        let slug = input.slug;
        let classify = |e| {
            classify_write_error(
                e,
                WriteTarget::Product {
                    slug: &slug,
                    category_ids: &category_ids,
                },
            )
        };

        let id = Uuid::now_v7();
        let now = Utc::now();
        let txn = begin(&self.db).await?;
        ensure_categories_exist(&txn, &category_ids).await?;

        product::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            slug: Set(slug.clone()),
            description: Set(input.description),
            price: Set(input.price),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(classify)?;

        insert_associations(&txn, id, &category_ids)
            .await
            .map_err(classify)?;

        txn.commit().await?;
        tracing::info!(product_id = %id, categories = category_ids.len(), "Created product");

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("product", id))
    }

    async fn fetch(&self, limit: u64, offset: u64) -> CatalogResult<Vec<Product>> {
        let bigint = |n: u64, what: &str| {
            i64::try_from(n)
                .map_err(|_| CatalogError::Validation(format!("{what} {n} is out of range")))
        };
        let (limit, offset) = (bigint(limit, "limit")?, bigint(offset, "offset")?);

        self.query_aggregate(
            &format!("{NEWEST_FIRST} LIMIT $1 OFFSET $2"),
            vec![limit.into(), offset.into()],
        )
        .await
    }

    async fn fetch_count(&self) -> CatalogResult<u64> {
        Ok(product::Entity::find().count(&self.db).await?)
    }

    async fn fetch_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let products = self
            .query_aggregate("WHERE p.id = $1", vec![id.into()])
            .await?;
        Ok(products.into_iter().next())
    }

    async fn fetch_by_category(&self, category_id: Uuid) -> CatalogResult<Vec<Product>> {
        self.query_aggregate(
            &format!(
                "WHERE EXISTS (SELECT 1 FROM product_categories pc \
                 WHERE pc.product_id = p.id AND pc.category_id = $1) {NEWEST_FIRST}"
            ),
            vec![category_id.into()],
        )
        .await
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> CatalogResult<Option<Product>> {
        let category_ids = dedup(changes.category_ids);
        let slug = changes.slug.clone().unwrap_or_default();
        let classify = |e| {
            classify_write_error(
                e,
                WriteTarget::Product {
                    slug: &slug,
                    category_ids: &category_ids,
                },
            )
        };

        let mut update = product::Entity::update_many()
            .col_expr(product::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(product::Column::Id.eq(id));
        if let Some(name) = changes.name {
            update = update.col_expr(product::Column::Name, Expr::value(name).into());
        }
        if let Some(new_slug) = changes.slug {
            update = update.col_expr(product::Column::Slug, Expr::value(new_slug).into());
        }
        if let Some(description) = changes.description {
            update = update.col_expr(product::Column::Description, Expr::value(description).into());
        }
        if let Some(price) = changes.price {
            update = update.col_expr(product::Column::Price, Expr::value(price).into());
        }

        let txn = begin(&self.db).await?;

        let result = update.exec(&txn).await.map_err(classify)?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        // Empty list means "keep the current categories"
        if !category_ids.is_empty() {
            ensure_categories_exist(&txn, &category_ids).await?;
            product_category::Entity::delete_many()
                .filter(product_category::Column::ProductId.eq(id))
                .exec(&txn)
                .await?;
            insert_associations(&txn, id, &category_ids)
                .await
                .map_err(classify)?;
        }

        txn.commit().await?;
        tracing::info!(
            product_id = %id,
            replaced_categories = !category_ids.is_empty(),
            "Updated product"
        );

        self.fetch_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;

    fn aggregate_row(id: Uuid, categories: Option<&str>) -> BTreeMap<String, Value> {
        let now = Utc::now();
        BTreeMap::from([
            ("id".to_string(), id.into()),
            ("name".to_string(), "Go 101".into()),
            ("slug".to_string(), "go-101".into()),
            ("description".to_string(), "".into()),
            ("price".to_string(), 9.99f64.into()),
            ("primary_image_url".to_string(), Value::String(None)),
            (
                "categories".to_string(),
                Value::String(categories.map(|c| c.to_string())),
            ),
            ("created_at".to_string(), now.into()),
            ("updated_at".to_string(), now.into()),
        ])
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(dedup(vec![a, b, a, b]), vec![a, b]);
    }

    #[tokio::test]
    async fn test_fetch_by_id_maps_aggregate_row() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![aggregate_row(id, None)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.fetch_by_id(id).await.unwrap().unwrap();

        assert_eq!(product.id, id);
        assert_eq!(product.primary_image_url, "");
        assert!(product.categories.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_tolerates_malformed_categories() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![aggregate_row(id, Some("{broken"))]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let products = repo.fetch(10, 0).await.unwrap();

        assert_eq!(products.len(), 1);
        assert!(products[0].categories.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rejects_offset_beyond_bigint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.fetch(10, i64::MAX as u64 + 1).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }
}

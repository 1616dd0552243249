//! Postgres repositories on top of SeaORM.
//!
//! Multi-statement writes run in one read-committed transaction. Anything
//! that changes which image is primary first locks the owning product row,
//! so concurrent calls for one product serialize.

mod category;
mod product;
mod product_image;

pub use category::PgCategoryRepository;
pub use product::PgProductRepository;
pub use product_image::PgProductImageRepository;

use sea_orm::{
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, IsolationLevel, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entity;

async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    db.begin_with_config(Some(IsolationLevel::ReadCommitted), None)
        .await
}

/// `SELECT ... FOR UPDATE` on a product row; `false` when it does not exist
async fn lock_product(txn: &DatabaseTransaction, product_id: Uuid) -> Result<bool, DbErr> {
    let row = entity::product::Entity::find_by_id(product_id)
        .lock_exclusive()
        .one(txn)
        .await?;
    Ok(row.is_some())
}

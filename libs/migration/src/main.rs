//! Standalone migration runner for the catalog schema.
//!
//! Reads `DATABASE_URL` and accepts the usual sea-orm-migration subcommands
//! (`up`, `down`, `status`, `fresh`, `refresh`).

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}

//! Shared application state.

use sea_orm::DatabaseConnection;

/// Cloned into each router; both fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// The process-wide connection pool
    pub db: DatabaseConnection,
}

//! Error handler for compass-data.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Enum representing store-side errors.
///
/// Gateway failures are not represented here: identity operations return
/// the gateway's own [`crate::gateway::GatewayError`] untouched.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQL request failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("no stored refresh token matches id {id}")]
    MissingRow { id: i64 },
}

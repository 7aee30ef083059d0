use thiserror::Error;
use uuid::Uuid;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not enough stock for product {product_id} to take {requested}")]
    StockConflict { product_id: Uuid, requested: i32 },

    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),
}

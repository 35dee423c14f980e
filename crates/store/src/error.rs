use domain::DomainError;
use thiserror::Error;

/// Errors raised inside the storage adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be mapped back into the domain.
    #[error("Corrupt value {value:?} in {table}.{column}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                DomainError::Conflict(db_err.message().to_string())
            }
            other => DomainError::Repository(Box::new(other)),
        }
    }
}

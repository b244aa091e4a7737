/// Error types for the post-synchronization layer
///
/// Refresh operations convert failures into log lines and keep the previous
/// collection; only the publish pipeline surfaces these errors to callers.
use thiserror::Error;

/// Result type for post-sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Publish was attempted with no authenticated identity
    #[error("not authenticated")]
    NotAuthenticated,

    /// Relational store operation failed
    #[error("database error: {0}")]
    Database(String),

    /// Object storage operation failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Local asset could not be materialized
    #[error("asset error: {0}")]
    Asset(#[from] asset_source::AssetError),
}

impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        SyncError::Database(err.to_string())
    }
}

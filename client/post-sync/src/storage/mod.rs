/// Object storage access layer
pub mod s3;

pub use s3::S3ObjectStore;

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Boundary to the remote object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under `key` with the declared content type.
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()>;

    /// Publicly fetchable address for `key`, derived from the key alone
    /// without a remote round trip.
    fn public_url(&self, key: &str) -> String;
}

/// Asset source abstraction for the Framez client
///
/// A post starts as a platform-specific asset handle (an image-picker URI, a
/// file path, a data URI) that has to be materialized into bytes before it
/// can be uploaded. The materialization strategies the mobile platforms need
/// live behind one trait so the publish pipeline stays platform-agnostic.
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Result type for asset materialization
pub type Result<T> = std::result::Result<T, AssetError>;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Retrieving the asset over HTTP failed
    #[error("asset fetch failed: {0}")]
    Fetch(String),

    /// Reading the asset from the filesystem failed
    #[error("asset read failed: {0}")]
    Read(String),

    /// The handle is not something this source can materialize
    #[error("invalid asset handle: {0}")]
    InvalidHandle(String),
}

/// Materializes a local asset handle into a binary payload.
///
/// Implementations must yield the identical payload for equivalent handles;
/// a store is wired with exactly one of them per platform.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn read_bytes(&self, handle: &str) -> Result<Bytes>;
}

/// Blob-retrieval strategy: the handle is a URL the platform serves the
/// asset from (content-provider bridges, dev servers).
pub struct HttpAssetSource {
    client: reqwest::Client,
}

impl HttpAssetSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn read_bytes(&self, handle: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(handle)
            .send()
            .await
            .map_err(|e| AssetError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AssetError::Fetch(e.to_string()))?;

        response
            .bytes()
            .await
            .map_err(|e| AssetError::Fetch(e.to_string()))
    }
}

/// Filesystem strategy: the handle is a path or `file://` URI; `data:` URIs
/// carrying a base64 payload are decoded in place.
pub struct FileAssetSource;

#[async_trait]
impl AssetSource for FileAssetSource {
    async fn read_bytes(&self, handle: &str) -> Result<Bytes> {
        if let Some(encoded) = data_uri_payload(handle) {
            use base64::Engine as _;

            let decoded = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| AssetError::InvalidHandle(format!("bad base64 payload: {e}")))?;
            return Ok(Bytes::from(decoded));
        }

        let path = handle.strip_prefix("file://").unwrap_or(handle);
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| AssetError::Read(format!("{path}: {e}")))?;

        Ok(Bytes::from(contents))
    }
}

/// Base64 payload of a `data:` URI, if the handle is one.
fn data_uri_payload(handle: &str) -> Option<&str> {
    let rest = handle.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if meta.ends_with(";base64") {
        Some(payload)
    } else {
        None
    }
}

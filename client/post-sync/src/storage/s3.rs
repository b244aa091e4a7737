/// S3-backed object store for post images
///
/// Works against AWS S3 or any S3-compatible store via a custom endpoint.
/// The bucket is public; object addresses are derived locally from the key.
use crate::config::StorageConfig;
use crate::error::{Result, SyncError};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    public_base_url: Option<String>,
}

impl S3ObjectStore {
    /// Initialize the S3 client with credentials from config.
    ///
    /// Explicit credentials take precedence; otherwise the default provider
    /// chain is used.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        use aws_sdk_s3::config::Region;

        let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            use aws_sdk_s3::config::Credentials;

            let credentials =
                Credentials::new(access_key_id, secret_access_key, None, None, "post_sync_s3");

            aws_config_builder = aws_config_builder.credentials_provider(credentials);
        }

        // Custom endpoint for S3-compatible storage like MinIO
        if let Some(endpoint) = &config.endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;

        Ok(Self {
            client: Client::new(&aws_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            public_base_url: config.public_base_url.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let error_msg = e.to_string();
                if error_msg.contains("403") || error_msg.contains("Forbidden") {
                    SyncError::Storage(
                        "S3 auth failed (403): Check storage credentials".to_string(),
                    )
                } else if error_msg.contains("NoSuchBucket") {
                    SyncError::Storage(format!("S3 bucket not found: {}", self.bucket))
                } else {
                    SyncError::Storage(format!("S3 upload failed: {e}"))
                }
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(
            self.public_base_url.as_deref(),
            &self.bucket,
            &self.region,
            key,
        )
    }
}

/// Public address for a key: the configured base when one is set, the
/// virtual-hosted S3 form otherwise.
fn public_object_url(
    public_base_url: Option<&str>,
    bucket: &str,
    region: &str,
    key: &str,
) -> String {
    match public_base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
        None => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

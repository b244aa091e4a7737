/// Configuration management for the post-synchronization layer
///
/// Loads connection settings for the remote relational store and the object
/// store from environment variables.
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Relational store configuration
    pub database: DatabaseConfig,
    /// Object storage configuration
    pub storage: StorageConfig,
}

/// Relational store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding post images
    pub bucket: String,
    pub region: String,
    /// Explicit credentials; the default provider chain is used when unset
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible storage
    pub endpoint: Option<String>,
    /// Base for public object addresses; the virtual-hosted S3 form is used
    /// when unset
    pub public_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/framez".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(5),
            },
            storage: StorageConfig {
                bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "posts".to_string()),
                region: std::env::var("STORAGE_REGION")
                    .unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("STORAGE_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("STORAGE_SECRET_ACCESS_KEY").ok(),
                endpoint: std::env::var("STORAGE_ENDPOINT").ok(),
                public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL").ok(),
            },
        })
    }
}

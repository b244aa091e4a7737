/// Framez client post-synchronization layer
///
/// Keeps the mobile client's post collections in sync with the remote
/// relational store: a global feed, the signed-in user's feed, and the
/// publish pipeline that uploads an image asset and inserts its metadata
/// row. UI consumers read this store and invoke its operations; they never
/// talk to the remote store directly.
///
/// # Modules
///
/// - `config`: Configuration management
/// - `db`: Remote relational store access layer
/// - `error`: Error types and handling
/// - `models`: Data structures for posts, profiles and identities
/// - `services`: Synchronization store and publish pipeline
/// - `session`: Reactive authenticated-identity gate
/// - `storage`: Object storage access layer
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::{Result, SyncError};
pub use services::{PostSyncStore, PublishStage};
pub use session::SessionGate;

use asset_source::AssetSource;
use std::sync::Arc;

/// Assemble a store wired to Postgres and S3 from configuration.
///
/// The caller picks the asset source for its platform and spawns the session
/// reactor on the returned store.
pub async fn connect(
    config: &Config,
    gate: &SessionGate,
    assets: Arc<dyn AssetSource>,
) -> Result<Arc<PostSyncStore>> {
    let pool = db::create_pool(&config.database).await?;
    let posts = Arc::new(db::PostgresPostStore::new(pool));
    let objects = Arc::new(storage::S3ObjectStore::new(&config.storage).await?);

    Ok(Arc::new(PostSyncStore::new(
        posts,
        objects,
        assets,
        gate.subscribe(),
    )))
}

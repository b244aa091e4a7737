/// Post synchronization store
///
/// Reconciles local feed state with the remote relational store: a global
/// feed and the signed-in user's feed, each replaced wholesale on refresh,
/// plus the publish pipeline that uploads an image asset, inserts its
/// metadata row and resynchronizes both feeds before resolving.
///
/// Refresh failures are logged and never surfaced; the previous collection
/// stays authoritative until a refresh succeeds. Publish failures are
/// surfaced to the caller with the originating cause.
use crate::db::PostStore;
use crate::error::{Result, SyncError};
use crate::models::{Identity, Post};
use crate::storage::ObjectStore;
use asset_source::AssetSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Content type declared for every upload. Sources are taken as-is, with no
/// validation or transcoding.
const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Stages of the publish pipeline, in order. A failed stage aborts the
/// remainder; an already-uploaded object is not deleted when a later stage
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    MaterializingBytes,
    Uploading,
    ResolvingAddress,
    InsertingRecord,
    Resyncing,
}

/// One refreshable feed: the current collection behind a watch channel, and
/// a request sequence guard that discards responses landing out of order.
struct FeedSlot {
    tx: watch::Sender<Vec<Post>>,
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl FeedSlot {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            tx,
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    /// Reserve the next request sequence number.
    fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the collection wholesale, unless a response issued later has
    /// already been applied. Returns false when this response was stale.
    async fn commit(&self, seq: u64, posts: Vec<Post>) -> bool {
        let mut applied = self.applied.lock().await;
        if seq <= *applied {
            return false;
        }
        *applied = seq;
        self.tx.send_replace(posts);
        true
    }

    fn snapshot(&self) -> Vec<Post> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Post>> {
        self.tx.subscribe()
    }
}

pub struct PostSyncStore {
    posts: Arc<dyn PostStore>,
    objects: Arc<dyn ObjectStore>,
    assets: Arc<dyn AssetSource>,
    session: watch::Receiver<Option<Identity>>,
    global_feed: FeedSlot,
    user_feed: FeedSlot,
    loading: watch::Sender<bool>,
}

impl PostSyncStore {
    /// Build a store over the three remote collaborators and a session
    /// subscription. Constructed once per application session and handed to
    /// UI consumers by reference.
    pub fn new(
        posts: Arc<dyn PostStore>,
        objects: Arc<dyn ObjectStore>,
        assets: Arc<dyn AssetSource>,
        session: watch::Receiver<Option<Identity>>,
    ) -> Self {
        let (loading, _rx) = watch::channel(false);

        Self {
            posts,
            objects,
            assets,
            session,
            global_feed: FeedSlot::new(),
            user_feed: FeedSlot::new(),
            loading,
        }
    }

    /// Snapshot of the global feed, newest first.
    pub fn global_feed(&self) -> Vec<Post> {
        self.global_feed.snapshot()
    }

    /// Snapshot of the signed-in user's feed, newest first.
    pub fn user_feed(&self) -> Vec<Post> {
        self.user_feed.snapshot()
    }

    /// Whether a global refresh is in flight.
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Reactive view of the global feed.
    pub fn subscribe_global_feed(&self) -> watch::Receiver<Vec<Post>> {
        self.global_feed.subscribe()
    }

    /// Reactive view of the user feed.
    pub fn subscribe_user_feed(&self) -> watch::Receiver<Vec<Post>> {
        self.user_feed.subscribe()
    }

    /// Reactive view of the loading flag.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    fn identity(&self) -> Option<Identity> {
        self.session.borrow().clone()
    }

    /// Refresh the global feed from the remote store.
    ///
    /// Sets the loading flag for the duration of the remote read and clears
    /// it on every path. On failure the previous collection is kept.
    pub async fn refresh_global_feed(&self) {
        let seq = self.global_feed.begin();
        self.loading.send_replace(true);

        match self.posts.find_all_posts().await {
            Ok(posts) => {
                if !self.global_feed.commit(seq, posts).await {
                    debug!(seq, "discarding stale global feed response");
                }
            }
            Err(err) => warn!(error = %err, "global feed refresh failed"),
        }

        self.loading.send_replace(false);
    }

    /// Refresh the signed-in user's feed. No-op while signed out.
    ///
    /// Does not touch the loading flag; only the global refresh drives it.
    pub async fn refresh_user_feed(&self) {
        let Some(identity) = self.identity() else {
            return;
        };

        let seq = self.user_feed.begin();

        match self.posts.find_posts_by_user(identity.id).await {
            Ok(posts) => {
                if !self.user_feed.commit(seq, posts).await {
                    debug!(seq, "discarding stale user feed response");
                }
            }
            Err(err) => {
                warn!(error = %err, user_id = %identity.id, "user feed refresh failed")
            }
        }
    }

    /// Publish a new post from a local asset handle.
    ///
    /// The steps run strictly in order and the first failure aborts the rest.
    /// Both feeds are refreshed before this resolves, so a caller observing
    /// success is guaranteed the new post is already visible in both.
    pub async fn publish(&self, handle: &str, caption: Option<&str>) -> Result<()> {
        // Checked before any I/O.
        let identity = self.identity().ok_or(SyncError::NotAuthenticated)?;

        debug!(stage = ?PublishStage::MaterializingBytes, handle, "publishing post");
        let payload = self.assets.read_bytes(handle).await?;

        let key = object_key(identity.id);
        debug!(stage = ?PublishStage::Uploading, key = %key, size = payload.len(), "publishing post");
        self.objects
            .put_object(&key, payload, UPLOAD_CONTENT_TYPE)
            .await?;

        debug!(stage = ?PublishStage::ResolvingAddress, key = %key, "publishing post");
        let image_url = self.objects.public_url(&key);

        debug!(stage = ?PublishStage::InsertingRecord, "publishing post");
        let caption = caption.filter(|c| !c.is_empty());
        self.posts
            .create_post(identity.id, &image_url, caption)
            .await?;

        debug!(stage = ?PublishStage::Resyncing, "publishing post");
        self.refresh_global_feed().await;
        self.refresh_user_feed().await;

        Ok(())
    }

    /// Spawn the session-change reactor.
    ///
    /// On every absent-to-present identity transition (including an identity
    /// already present at spawn), one global refresh and one user refresh run
    /// concurrently. Identity loss triggers nothing and cached feeds stay in
    /// place. The task exits when the session gate is dropped.
    pub fn spawn_session_reactor(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut session = self.session.clone();

        tokio::spawn(async move {
            let mut signed_in = session.borrow_and_update().is_some();

            if signed_in {
                tokio::join!(store.refresh_global_feed(), store.refresh_user_feed());
            }

            while session.changed().await.is_ok() {
                let present = session.borrow_and_update().is_some();

                if present && !signed_in {
                    tokio::join!(store.refresh_global_feed(), store.refresh_user_feed());
                }

                signed_in = present;
            }

            debug!("session gate closed, reactor stopped");
        })
    }
}

/// Storage key for a new upload, namespaced by the identity so storage
/// access policy can stay identity-scoped, with a collision-resistant
/// random suffix.
fn object_key(identity_id: Uuid) -> String {
    format!("{identity_id}/{}.jpg", Uuid::new_v4())
}

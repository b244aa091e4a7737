//! Mock remote stores for integration tests
//!
//! In-memory stand-ins for the relational store and the object store, with
//! call counters so tests can verify I/O boundaries (e.g. that a failed
//! precondition performs zero remote calls).

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use post_sync::db::PostStore;
use post_sync::error::{Result, SyncError};
use post_sync::models::{Post, Profile};
use post_sync::storage::ObjectStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Mock relational store backed by an in-memory row set.
///
/// Reads simulate the server-side join and ordering; writes assign ids and
/// strictly increasing timestamps so feed order is deterministic.
pub struct MockPostStore {
    rows: Mutex<Vec<Post>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    fail_reads: AtomicBool,
    read_delay: Mutex<Option<std::time::Duration>>,
    clock: AtomicI64,
    all_read_calls: AtomicUsize,
    user_read_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl MockPostStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            profiles: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            read_delay: Mutex::new(None),
            clock: AtomicI64::new(0),
            all_read_calls: AtomicUsize::new(0),
            user_read_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
        }
    }

    pub fn seed_profile(&self, profile: Profile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    /// Insert a row directly, bypassing the store under test.
    pub fn seed_post(&self, user_id: Uuid, image_url: &str, caption: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);

        self.rows.lock().unwrap().push(Post {
            id,
            user_id,
            image_url: image_url.to_string(),
            caption: caption.map(str::to_string),
            created_at: Utc::now() + Duration::seconds(tick),
            author: None,
        });

        id
    }

    pub fn clear_posts(&self) {
        self.rows.lock().unwrap().clear();
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Delay the next read after it has snapshotted the rows, simulating a
    /// response that is slow in transit.
    pub fn set_read_delay(&self, delay: std::time::Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    pub fn all_read_call_count(&self) -> usize {
        self.all_read_calls.load(Ordering::SeqCst)
    }

    pub fn user_read_call_count(&self) -> usize {
        self.user_read_calls.load(Ordering::SeqCst)
    }

    pub fn insert_call_count(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Simulated join + ordering, as the remote query engine would return it.
    fn joined(&self, author: Option<Uuid>) -> Vec<Post> {
        let profiles = self.profiles.lock().unwrap();
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| author.map_or(true, |id| p.user_id == id))
            .cloned()
            .map(|mut p| {
                p.author = profiles.get(&p.user_id).cloned();
                p
            })
            .collect();

        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    async fn read(&self, author: Option<Uuid>) -> Result<Vec<Post>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SyncError::Database("simulated outage".to_string()));
        }

        let snapshot = self.joined(author);

        let delay = self.read_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(snapshot)
    }
}

#[async_trait]
impl PostStore for MockPostStore {
    async fn find_all_posts(&self) -> Result<Vec<Post>> {
        self.all_read_calls.fetch_add(1, Ordering::SeqCst);
        self.read(None).await
    }

    async fn find_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        self.user_read_calls.fetch_add(1, Ordering::SeqCst);
        self.read(Some(user_id)).await
    }

    async fn create_post(
        &self,
        user_id: Uuid,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.seed_post(user_id, image_url, caption);
        Ok(())
    }
}

/// One recorded upload.
#[derive(Debug, Clone)]
pub struct UploadedObject {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// Mock object store recording every upload.
pub struct MockObjectStore {
    uploads: Mutex<Vec<UploadedObject>>,
    fail_uploads: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<UploadedObject> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(SyncError::Storage("simulated storage outage".to_string()));
        }

        self.uploads.lock().unwrap().push(UploadedObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        });

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.framez.test/{key}")
    }
}

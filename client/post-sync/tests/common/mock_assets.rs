//! Mock asset source for integration tests

use asset_source::{AssetError, AssetSource};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Asset source returning a fixed payload for every handle.
pub struct StaticAssetSource {
    payload: Bytes,
    fail: AtomicBool,
    read_calls: AtomicUsize,
}

impl StaticAssetSource {
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: Bytes::copy_from_slice(payload),
            fail: AtomicBool::new(false),
            read_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn read_call_count(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetSource for StaticAssetSource {
    async fn read_bytes(&self, _handle: &str) -> asset_source::Result<Bytes> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(AssetError::Read("simulated unreadable asset".to_string()));
        }

        Ok(self.payload.clone())
    }
}

/// Data models for the post-synchronization layer
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user reference, owned by the session gate.
///
/// The sync layer only reads it; presence or absence of an identity is the
/// sole trigger for feed refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// Denormalized author snapshot joined into a post at fetch time.
///
/// Not cached independently: if the author's profile changes remotely,
/// already-fetched posts keep the stale snapshot until the next full refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// A published post.
///
/// `image_url` is always a fully resolved public address once the post
/// appears in a collection. Posts are never mutated after creation; they are
/// only replaced wholesale by a feed refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Author profile joined at fetch time; absent when the join found none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Profile>,
}

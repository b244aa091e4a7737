/// Post repository - reads and writes against the remote posts table
///
/// Feeds are read with the author profile joined in and ordered newest-first
/// by the server; the client never re-sorts or merges.
use crate::error::Result;
use crate::models::{Post, Profile};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Boundary to the remote relational store.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every post joined with its author profile, newest first.
    async fn find_all_posts(&self) -> Result<Vec<Post>>;

    /// One author's posts joined with the author profile, newest first.
    async fn find_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>>;

    /// Insert a post metadata row. `id` and `created_at` are assigned
    /// remotely.
    async fn create_post(
        &self,
        user_id: Uuid,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<()>;
}

pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn post_from_row(row: &PgRow) -> Post {
    let author_id: Option<Uuid> = row.get("author_id");

    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        image_url: row.get("image_url"),
        caption: row.get("caption"),
        created_at: row.get("created_at"),
        author: author_id.map(|id| Profile {
            id,
            username: row.get("author_username"),
            avatar_url: row.get("author_avatar_url"),
        }),
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn find_all_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.user_id, p.image_url, p.caption, p.created_at,
                   pr.id AS author_id,
                   pr.username AS author_username,
                   pr.avatar_url AS author_avatar_url
            FROM posts p
            LEFT JOIN profiles pr ON p.user_id = pr.id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    async fn find_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.user_id, p.image_url, p.caption, p.created_at,
                   pr.id AS author_id,
                   pr.username AS author_username,
                   pr.avatar_url AS author_avatar_url
            FROM posts p
            LEFT JOIN profiles pr ON p.user_id = pr.id
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    async fn create_post(
        &self,
        user_id: Uuid,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (user_id, image_url, caption)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(image_url)
        .bind(caption)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

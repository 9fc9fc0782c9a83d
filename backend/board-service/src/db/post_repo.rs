use crate::db::PostStore;
use crate::error::Result;
use crate::models::{FeedWindow, NewPost, Post, PostRow, SortOrder};
use async_trait::async_trait;
use sqlx::PgPool;

const FIND_DESC: &str = r#"
    SELECT id, name, content, like_count, created
    FROM posts
    ORDER BY created DESC, id DESC
    LIMIT $1 OFFSET $2
"#;

const FIND_ASC: &str = r#"
    SELECT id, name, content, like_count, created
    FROM posts
    ORDER BY created ASC, id ASC
    LIMIT $1 OFFSET $2
"#;

/// Postgres-backed post store.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find(&self, window: &FeedWindow) -> Result<Vec<Post>> {
        let sql = match window.sort {
            SortOrder::Desc => FIND_DESC,
            SortOrder::Asc => FIND_ASC,
        };

        let rows = sqlx::query_as::<_, PostRow>(sql)
            .bind(window.limit)
            .bind(window.skip)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn insert(&self, post: NewPost) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (name, content, like_count, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, content, like_count, created
            "#,
        )
        .bind(&post.name)
        .bind(&post.content)
        .bind(post.like_count)
        .bind(post.created)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

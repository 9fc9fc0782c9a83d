//! Post storage.
//!
//! The feed and write paths only need `count`, a windowed `find`, and
//! `insert`. `PgPostStore` is the production store; `InMemoryPostStore`
//! backs local runs and tests.

pub mod memory;
pub mod post_repo;

pub use memory::InMemoryPostStore;
pub use post_repo::PgPostStore;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::models::{FeedWindow, NewPost, Post};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Total number of stored posts.
    async fn count(&self) -> Result<i64>;

    /// Posts ordered by `(created, id)` in the window's direction, then
    /// skipped and limited.
    async fn find(&self, window: &FeedWindow) -> Result<Vec<Post>>;

    /// Stores `post` and returns it with its assigned identity.
    async fn insert(&self, post: NewPost) -> Result<Post>;
}

pub async fn create_pool(config: &StorageConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

use crate::db::PostStore;
use crate::error::Result;
use crate::models::{FeedWindow, NewPost, Post, SortOrder};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local post store. Identities start at 1 and follow insertion order.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn count(&self) -> Result<i64> {
        Ok(self.posts.read().await.len() as i64)
    }

    async fn find(&self, window: &FeedWindow) -> Result<Vec<Post>> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| (a.created, a.id).cmp(&(b.created, b.id)));
        if window.sort == SortOrder::Desc {
            posts.reverse();
        }

        Ok(posts
            .into_iter()
            .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(0))
            .collect())
    }

    async fn insert(&self, post: NewPost) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let stored = Post {
            id: posts.len() as i64 + 1,
            name: post.name,
            content: post.content,
            like_count: post.like_count,
            created: post.created,
        };
        posts.push(stored.clone());
        Ok(stored)
    }
}

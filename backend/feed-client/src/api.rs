//! Board HTTP API.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use board_types::{CreatePostRequest, ErrorBody, FeedPage, Post, SortOrder, MAX_PAGE_LIMIT};
use reqwest::StatusCode;
use std::collections::HashSet;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedApi: Send + Sync {
    async fn fetch_page(&self, skip: i64, limit: i64, sort: SortOrder) -> Result<FeedPage>;

    async fn create_post(&self, request: CreatePostRequest) -> Result<Post>;
}

/// Posts gathered for a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub posts: Vec<Post>,
    /// The page cap was hit before the end of the feed.
    pub truncated: bool,
}

/// Walks the feed newest-first at the largest page size until the server
/// reports no more posts or `max_pages` pages have been read.
///
/// Offset paging shifts when posts are written mid-walk, so a post can come
/// back on two consecutive pages. Each id is kept once.
pub async fn fetch_all(api: &dyn FeedApi, max_pages: u32) -> Result<SearchResults> {
    let mut posts = Vec::new();
    let mut seen = HashSet::new();
    let mut skip = 0;

    for _ in 0..max_pages {
        let page = api.fetch_page(skip, MAX_PAGE_LIMIT, SortOrder::Desc).await?;
        let received = page.posts.len();
        posts.extend(page.posts.into_iter().filter(|post| seen.insert(post.id)));

        if !page.meta.has_more || received == 0 {
            return Ok(SearchResults {
                posts,
                truncated: false,
            });
        }
        skip = page.meta.skip + page.meta.limit;
    }

    tracing::warn!(max_pages, collected = posts.len(), "search stopped at page cap");
    Ok(SearchResults {
        posts,
        truncated: true,
    })
}

/// reqwest-backed client. Requests are bounded by the configured timeout and
/// are never retried.
#[derive(Clone)]
pub struct HttpFeedApi {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpFeedApi {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            timeout_ms: config.request_timeout.as_millis() as u64,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_ms)
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| self.transport_error(e));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(match status {
            StatusCode::UNPROCESSABLE_ENTITY => ClientError::Rejected(message),
            StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl FeedApi for HttpFeedApi {
    async fn fetch_page(&self, skip: i64, limit: i64, sort: SortOrder) -> Result<FeedPage> {
        let response = self
            .client
            .get(format!("{}/posts", self.base_url))
            .query(&[
                ("skip", skip.to_string()),
                ("limit", limit.to_string()),
                ("sort", sort.as_str().to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }

    async fn create_post(&self, request: CreatePostRequest) -> Result<Post> {
        let response = self
            .client
            .post(format!("{}/posts", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }
}

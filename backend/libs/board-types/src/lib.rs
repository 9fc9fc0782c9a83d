//! # Board Types
//!
//! Wire types shared by `board-service` and `feed-client`.
//!
//! All JSON payloads use camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum trimmed length of a post author name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Maximum trimmed length of a post body, in characters.
pub const MAX_CONTENT_CHARS: usize = 140;

/// Maximum trimmed length of a search term, in characters.
pub const MAX_SEARCH_CHARS: usize = 20;

/// Page size used when the request does not carry a usable `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Upper bound the server applies to any requested `limit`.
pub const MAX_PAGE_LIMIT: i64 = 50;

/// A stored message board post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Storage-assigned identity, strictly increasing in insertion order.
    pub id: i64,
    pub name: String,
    pub content: String,
    pub like_count: i64,
    pub created: DateTime<Utc>,
}

/// Sort direction over `created`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Pagination metadata returned alongside every feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub has_more: bool,
}

impl PageMeta {
    /// Builds the metadata for a requested window.
    ///
    /// `has_more` is derived from the requested window rather than from the
    /// number of rows actually returned, so a short final page still reports
    /// `false` correctly.
    pub fn for_window(total: i64, skip: i64, limit: i64) -> Self {
        Self {
            total,
            skip,
            limit,
            has_more: total > skip.saturating_add(limit),
        }
    }
}

/// One window of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub meta: PageMeta,
}

/// Body of `POST /posts`.
///
/// Unknown fields (`likeCount`, `created`, ...) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CreatePostRequest {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: Some(content.into()),
        }
    }
}

/// Error payload returned by the service for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Fixed liveness payload served at `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}

/// Checks the trimmed length bounds shared by client and server.
pub fn is_valid_post(name: &str, content: &str) -> bool {
    within_bounds(name, MAX_NAME_CHARS) && within_bounds(content, MAX_CONTENT_CHARS)
}

fn within_bounds(value: &str, max_chars: usize) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= max_chars
}

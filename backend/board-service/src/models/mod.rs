/// Data models for board-service
///
/// - `FeedWindow`: the server-clamped `(skip, limit, sort)` triple
/// - `FeedQueryParams`: raw, untrusted query string values
/// - `NewPost`: a validated, sanitized post awaiting an identity
/// - `PostRow`: the Postgres row shape
pub use board_types::{FeedPage, PageMeta, Post, SortOrder};

use board_types::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw `GET /posts` query values, kept as strings so malformed numbers fall
/// back to defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQueryParams {
    pub skip: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// A requested page of the feed, always within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    pub skip: i64,
    pub limit: i64,
    pub sort: SortOrder,
}

impl FeedWindow {
    /// Clamps `skip` to `>= 0` and `limit` to `[1, MAX_PAGE_LIMIT]`.
    pub fn new(skip: i64, limit: i64, sort: SortOrder) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            sort,
        }
    }

    pub fn from_params(params: &FeedQueryParams) -> Self {
        let skip = params
            .skip
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(0);
        // Zero is treated like a missing limit.
        let limit = params
            .limit
            .as_deref()
            .and_then(parse_leading_int)
            .filter(|limit| *limit != 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        let sort = match params.sort.as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some(_) => SortOrder::Asc,
        };

        Self::new(skip, limit, sort)
    }
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT, SortOrder::Desc)
    }
}

/// Parses the leading integer of `raw`: optional whitespace, optional sign,
/// then digits. Trailing garbage is ignored (`"2.5"` is 2); no digits is `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// A post that passed moderation and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub name: String,
    pub content: String,
    pub like_count: i64,
    pub created: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub like_count: i64,
    pub created: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            name: row.name,
            content: row.content,
            like_count: row.like_count,
            created: row.created,
        }
    }
}

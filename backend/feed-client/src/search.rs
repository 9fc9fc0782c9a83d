//! Client-side search over fetched posts.

use board_types::{Post, MAX_SEARCH_CHARS};

/// A search term is usable when, trimmed, it is non-empty and at most
/// `MAX_SEARCH_CHARS` characters.
pub fn is_valid_search(term: &str) -> bool {
    let trimmed = term.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_SEARCH_CHARS
}

/// Lower-cased, trimmed form used for matching.
pub fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Case-insensitive substring match on name or content. `needle` must
/// already be normalized.
pub fn matches(post: &Post, needle: &str) -> bool {
    post.name.to_lowercase().contains(needle) || post.content.to_lowercase().contains(needle)
}

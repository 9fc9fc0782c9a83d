/// Business logic for the board: feed paging, post moderation, and the
/// profanity mask applied on the write path.
pub mod feed_query;
pub mod moderation;
pub mod profanity;

pub use feed_query::FeedQueryEngine;
pub use moderation::{validate_post, ModerationPipeline, PostDraft, VALIDATION_MESSAGE};
pub use profanity::ProfanityFilter;

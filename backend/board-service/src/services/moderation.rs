/// Post moderation - validation, profanity masking, and persistence
use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::metrics::{POSTS_CREATED_TOTAL, POST_REJECTIONS_TOTAL};
use crate::models::{NewPost, Post};
use crate::services::ProfanityFilter;
use board_types::CreatePostRequest;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub const VALIDATION_MESSAGE: &str = "Name and content are required. Name cannot be longer than 50 characters and content cannot be longer than 140 characters.";

/// Trimmed submission fields, bounds-checked in characters.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct PostDraft {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 140))]
    pub content: String,
}

/// Trims the submission and checks its bounds. Absent fields count as empty.
pub fn validate_post(req: &CreatePostRequest) -> Result<PostDraft> {
    let draft = PostDraft {
        name: req.name.as_deref().unwrap_or_default().trim().to_string(),
        content: req.content.as_deref().unwrap_or_default().trim().to_string(),
    };

    draft
        .validate()
        .map_err(|_| AppError::Validation(VALIDATION_MESSAGE.to_string()))?;

    Ok(draft)
}

pub struct ModerationPipeline {
    filter: Arc<ProfanityFilter>,
    store: Arc<dyn PostStore>,
}

impl ModerationPipeline {
    pub fn new(filter: Arc<ProfanityFilter>, store: Arc<dyn PostStore>) -> Self {
        Self { filter, store }
    }

    /// Validates, masks both fields, and stamps server-owned values.
    /// Client-supplied like counts and timestamps never reach this point.
    pub fn validate_and_sanitize(&self, req: &CreatePostRequest) -> Result<NewPost> {
        let draft = validate_post(req)?;

        Ok(NewPost {
            name: self.filter.clean(&draft.name),
            content: self.filter.clean(&draft.content),
            like_count: 0,
            created: Utc::now(),
        })
    }

    pub async fn create_post(&self, req: &CreatePostRequest) -> Result<Post> {
        let post = match self.validate_and_sanitize(req) {
            Ok(post) => post,
            Err(err) => {
                POST_REJECTIONS_TOTAL.with_label_values(&["validation"]).inc();
                tracing::debug!("post rejected: {}", err);
                return Err(err);
            }
        };

        let stored = self.store.insert(post).await.map_err(|err| {
            POST_REJECTIONS_TOTAL.with_label_values(&["storage"]).inc();
            err
        })?;

        POSTS_CREATED_TOTAL.inc();
        tracing::info!(post_id = stored.id, "post created");
        Ok(stored)
    }
}

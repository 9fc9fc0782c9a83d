/// Error types for Board Service
///
/// Errors are converted to `{ "message": ... }` JSON responses. Storage and
/// internal failures are logged and answered with a generic message.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use board_types::ErrorBody;
use thiserror::Error;

/// Result type for board-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or oversized submission; user-correctable.
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::Validation(msg) => msg.clone(),
            other => {
                tracing::error!("request failed: {}", other);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(status).json(ErrorBody { message })
    }
}

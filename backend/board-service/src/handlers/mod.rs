/// HTTP handlers for the message board
///
/// - Posts: paged feed reads and rate-limited post creation
/// - Health: liveness at `/` and storage readiness
pub mod health;
pub mod posts;

pub use health::{liveness, readiness};
pub use posts::{create_post, get_posts};

use crate::error::AppError;
use crate::services::VALIDATION_MESSAGE;
use actix_middleware::RateLimitMiddleware;
use actix_web::{guard, web};

/// Largest accepted `POST /posts` body, in bytes.
pub const MAX_BODY_BYTES: usize = 4 * 1024;

/// Malformed or oversized bodies are answered like any other invalid submission.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req| {
            tracing::debug!("rejected post body: {}", err);
            AppError::Validation(VALIDATION_MESSAGE.to_string()).into()
        })
}

/// Registers the board routes. Only `POST /posts` passes through the limiter.
pub fn configure(cfg: &mut web::ServiceConfig, rate_limit: RateLimitMiddleware) {
    cfg.app_data(json_config())
        .route("/", web::get().to(liveness))
        .route("/health/ready", web::get().to(readiness))
        .route("/metrics", web::get().to(crate::metrics::serve_metrics))
        .service(
            web::resource("/posts")
                .guard(guard::Post())
                .route(web::post().to(create_post))
                .wrap(rate_limit),
        )
        .service(web::resource("/posts").route(web::get().to(get_posts)));
}

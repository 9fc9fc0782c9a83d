//! Prometheus metrics for board-service.
//!
//! Exposes feed and write-path collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Duration of feed page queries by sort direction.
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed page query duration segmented by sort direction",
        &["sort"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Feed page queries by outcome (ok, error).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Feed page queries segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register feed_request_total");

    /// Posts persisted.
    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "posts_created_total",
        "Posts accepted and persisted"
    )
    .expect("failed to register posts_created_total");

    /// Post submissions that did not persist, by reason (validation, storage).
    pub static ref POST_REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "post_rejections_total",
        "Post submissions that were not persisted segmented by reason",
        &["reason"]
    )
    .expect("failed to register post_rejections_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

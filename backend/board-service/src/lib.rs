/// Board Service Library
///
/// Serves the message board feed and accepts new posts.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route wiring
/// - `models`: Feed window parsing and storage-facing records
/// - `services`: Feed queries, moderation, profanity filtering
/// - `db`: Post storage (Postgres and in-memory)
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

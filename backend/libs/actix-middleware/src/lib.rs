//! # Actix Middleware Library
//!
//! Shared middleware components for the board's Actix services.
//!
//! ## Modules
//! - `rate_limit`: fixed-window write throttling with in-memory and Redis backends

pub mod rate_limit;

pub use rate_limit::{
    Clock, FailureMode, InMemoryBackend, KeyStrategy, RateLimitBackend, RateLimitConfig,
    RateLimitDecision, RateLimitError, RateLimitMiddleware, RateLimiter, RedisBackend,
    SystemClock,
};

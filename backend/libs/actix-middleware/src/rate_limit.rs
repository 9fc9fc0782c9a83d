//! Fixed-window rate limiting for write routes.
//!
//! Every hit atomically increments a per-key counter; the request is rejected
//! once the post-increment count exceeds `max_requests` within the window.
//! The first hit after a window has elapsed opens a fresh window.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::{ready, LocalBoxFuture, Ready};
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};
use redis::aio::ConnectionManager;
use std::net::IpAddr;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;

lazy_static! {
    /// Rate limit decisions segmented by outcome (allowed, limited, backend_error).
    pub static ref RATE_LIMIT_DECISIONS: IntCounterVec = register_int_counter_vec!(
        "rate_limit_decisions_total",
        "Rate limit decisions segmented by outcome",
        &["decision"]
    )
    .expect("failed to register rate_limit_decisions_total");
}

/// How requests are grouped into counting keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// One counter per source address.
    #[default]
    PerIp,
    /// A single counter shared by every client.
    Global,
}

impl FromStr for KeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-ip" | "ip" => Ok(KeyStrategy::PerIp),
            "global" => Ok(KeyStrategy::Global),
            other => Err(format!("unknown rate limit key strategy '{}'", other)),
        }
    }
}

/// What to do when the counting backend errors or times out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Let the request through and log.
    #[default]
    FailOpen,
    /// Reject with 503.
    FailClosed,
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-open" | "open" => Ok(FailureMode::FailOpen),
            "fail-closed" | "closed" => Ok(FailureMode::FailClosed),
            other => Err(format!("unknown rate limit failure mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
    pub key_strategy: KeyStrategy,
    /// Key on the first `X-Forwarded-For` hop instead of the socket peer.
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    pub failure_mode: FailureMode,
    /// Backend operation timeout in milliseconds
    pub backend_timeout_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1,
            window_seconds: 10,
            key_strategy: KeyStrategy::PerIp,
            trust_forwarded_for: false,
            failure_mode: FailureMode::FailOpen,
            backend_timeout_ms: 100,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds.max(1))
    }
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("rate limit backend timed out after {0}ms")]
    Timeout(u64),
}

/// Counting store behind the limiter.
#[async_trait]
pub trait RateLimitBackend: Send + Sync {
    /// Records one hit for `key` and returns the number of hits in the
    /// current window, this one included.
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, RateLimitError>;
}

/// Time source for the in-memory backend.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
struct WindowCounter {
    opened_at: Instant,
    hits: u64,
}

/// Process-local fixed-window counters.
///
/// Increment-and-check runs under the DashMap shard lock for the key, so
/// concurrent hits on the same key never lose an update.
pub struct InMemoryBackend<C: Clock = SystemClock> {
    windows: DashMap<String, WindowCounter>,
    clock: C,
}

impl InMemoryBackend<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryBackend<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryBackend<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
        }
    }

    /// Drops counters whose window has elapsed. Returns how many were removed.
    pub fn purge_expired(&self, window: Duration) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows
            .retain(|_, counter| now.duration_since(counter.opened_at) < window);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[async_trait]
impl<C: Clock> RateLimitBackend for InMemoryBackend<C> {
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, RateLimitError> {
        let now = self.clock.now();
        let hits = {
            let mut counter = self
                .windows
                .entry(key.to_string())
                .or_insert_with(|| WindowCounter {
                    opened_at: now,
                    hits: 0,
                });
            if now.duration_since(counter.opened_at) >= window {
                counter.opened_at = now;
                counter.hits = 0;
            }
            counter.hits += 1;
            counter.hits
        };
        Ok(hits)
    }
}

/// INCR and set the TTL on the first hit in one round trip.
const FIXED_WINDOW_LUA: &str = r#"
    local current = redis.call('INCR', KEYS[1])
    if current == 1 then
        redis.call('EXPIRE', KEYS[1], ARGV[1])
    end
    return current
"#;

/// Redis-backed counters, shared across service replicas.
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RateLimitBackend for RedisBackend {
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, RateLimitError> {
        let mut conn = self.conn.clone();
        let count: i64 = redis::cmd("EVAL")
            .arg(FIXED_WINDOW_LUA)
            .arg(1)
            .arg(format!("rate_limit:{}", key))
            .arg(window.as_secs().max(1))
            .query_async(&mut conn)
            .await?;

        Ok(count.max(0) as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u64 },
    Limited { retry_after: Duration },
}

#[derive(Clone)]
pub struct RateLimiter {
    backend: Arc<dyn RateLimitBackend>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(backend: Arc<dyn RateLimitBackend>, config: RateLimitConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Counts one request for `key` and decides whether it may proceed.
    pub async fn check(&self, key: &str) -> Result<RateLimitDecision, RateLimitError> {
        let timeout_ms = self.config.backend_timeout_ms;
        let hits = timeout(
            Duration::from_millis(timeout_ms),
            self.backend.hit(key, self.config.window()),
        )
        .await
        .map_err(|_| RateLimitError::Timeout(timeout_ms))??;

        let max = u64::from(self.config.max_requests);
        if hits > max {
            Ok(RateLimitDecision::Limited {
                retry_after: self.config.window(),
            })
        } else {
            Ok(RateLimitDecision::Allowed {
                remaining: max - hits,
            })
        }
    }
}

#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: RateLimiter,
}

impl RateLimitMiddleware {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let key = client_key(&req, limiter.config());

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(RateLimitDecision::Allowed { remaining }) => {
                    RATE_LIMIT_DECISIONS.with_label_values(&["allowed"]).inc();
                    tracing::debug!(client = %key, remaining, "rate limit check passed");
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Ok(RateLimitDecision::Limited { retry_after }) => {
                    RATE_LIMIT_DECISIONS.with_label_values(&["limited"]).inc();
                    tracing::warn!(client = %key, path = %req.path(), "rate limit exceeded");
                    let response = too_many_requests(limiter.config(), retry_after);
                    Ok(req.into_response(response).map_into_right_body())
                }
                Err(err) => {
                    RATE_LIMIT_DECISIONS
                        .with_label_values(&["backend_error"])
                        .inc();
                    match limiter.config().failure_mode {
                        FailureMode::FailOpen => {
                            tracing::warn!(client = %key, "rate limiter unavailable, allowing request: {}", err);
                            service.call(req).await.map(ServiceResponse::map_into_left_body)
                        }
                        FailureMode::FailClosed => {
                            tracing::error!(client = %key, "rate limiter unavailable, rejecting request: {}", err);
                            Ok(req.into_response(backend_unavailable()).map_into_right_body())
                        }
                    }
                }
            }
        })
    }
}

/// Derives the counting key for a request.
fn client_key(req: &ServiceRequest, config: &RateLimitConfig) -> String {
    match config.key_strategy {
        KeyStrategy::Global => "global".to_string(),
        KeyStrategy::PerIp => {
            let forwarded = if config.trust_forwarded_for {
                forwarded_client_ip(req)
            } else {
                None
            };
            match forwarded.or_else(|| req.peer_addr().map(|addr| addr.ip())) {
                Some(ip) => format!("ip:{}", ip),
                None => "ip:unknown".to_string(),
            }
        }
    }
}

/// First hop of `X-Forwarded-For`, if it parses as an address.
fn forwarded_client_ip(req: &ServiceRequest) -> Option<IpAddr> {
    req.headers()
        .get("X-Forwarded-For")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

fn too_many_requests(config: &RateLimitConfig, retry_after: Duration) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header((header::RETRY_AFTER, retry_after.as_secs().to_string()))
        .json(serde_json::json!({
            "message": format!(
                "Too many posts: at most {} every {} seconds.",
                config.max_requests, config.window_seconds
            )
        }))
}

fn backend_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "message": "Rate limiter unavailable, try again later."
    }))
}

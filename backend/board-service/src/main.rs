use actix_cors::Cors;
use actix_middleware::{
    InMemoryBackend, RateLimitBackend, RateLimitMiddleware, RateLimiter, RedisBackend,
};
use actix_web::{web, App, HttpServer};
use board_service::config::{LimiterBackend, StorageBackend};
use board_service::db::{self, InMemoryPostStore, PgPostStore, PostStore};
use board_service::handlers;
use board_service::services::{FeedQueryEngine, ModerationPipeline, ProfanityFilter};
use board_service::Config;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn other_err(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::Other, msg)
}

async fn build_store(config: &Config) -> io::Result<Arc<dyn PostStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory post storage; posts are lost on restart");
            Ok(Arc::new(InMemoryPostStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.storage)
                .await
                .map_err(|e| other_err(format!("Failed to create database pool: {e}")))?;
            db::run_migrations(&pool)
                .await
                .map_err(|e| other_err(format!("Failed to run migrations: {e}")))?;
            tracing::info!("Connected to database");
            Ok(Arc::new(PgPostStore::new(pool)))
        }
    }
}

async fn build_limiter(config: &Config) -> io::Result<RateLimiter> {
    let settings = &config.rate_limit;
    let backend: Arc<dyn RateLimitBackend> = match settings.backend {
        LimiterBackend::Memory => {
            let backend = Arc::new(InMemoryBackend::new());
            let purger = backend.clone();
            let window = settings.limits.window();
            // Idle clients would otherwise keep their counters forever.
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(window.max(Duration::from_secs(60)));
                loop {
                    ticker.tick().await;
                    let removed = purger.purge_expired(window);
                    if removed > 0 {
                        tracing::debug!(removed, "purged expired rate limit windows");
                    }
                }
            });
            backend
        }
        LimiterBackend::Redis => {
            let client = redis::Client::open(settings.redis_url.as_str())
                .map_err(|e| other_err(format!("Invalid REDIS_URL: {e}")))?;
            let manager = redis::aio::ConnectionManager::new(client)
                .await
                .map_err(|e| other_err(format!("Failed to connect to Redis: {e}")))?;
            tracing::info!("Rate limiting backed by Redis");
            Arc::new(RedisBackend::new(manager))
        }
    };

    tracing::info!(
        max_requests = settings.limits.max_requests,
        window_seconds = settings.limits.window_seconds,
        key = ?settings.limits.key_strategy,
        "POST /posts rate limit configured"
    );
    Ok(RateLimiter::new(backend, settings.limits.clone()))
}

fn build_cors(config: &Config) -> Cors {
    let mut cors = Cors::default();
    for origin in config.cors.origins() {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Board Service
///
/// Serves the paged message feed and accepts new posts.
///
/// # Routes
///
/// - `GET /` - liveness
/// - `GET /posts` - paged feed
/// - `POST /posts` - create a post (rate limited)
/// - `GET /health/ready` - storage readiness
/// - `GET /metrics` - Prometheus metrics
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting board-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let store = build_store(&config).await?;
    let filter = Arc::new(
        ProfanityFilter::from_config(&config.moderation).map_err(|e| other_err(e.to_string()))?,
    );
    let limiter = build_limiter(&config).await?;

    let engine = web::Data::new(FeedQueryEngine::new(store.clone()));
    let pipeline = web::Data::new(ModerationPipeline::new(filter, store.clone()));
    let store_data: web::Data<dyn PostStore> = web::Data::from(store);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .app_data(pipeline.clone())
            .app_data(store_data.clone())
            .wrap(build_cors(&server_config))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| {
                handlers::configure(cfg, RateLimitMiddleware::new(limiter.clone()))
            })
    })
    .bind(&bind_address)?
    .workers(config.app.workers)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            tracing::warn!("HTTP server exited");
            return match result {
                Ok(result) => result,
                Err(e) => Err(other_err(e.to_string())),
            };
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    if let Err(e) = server_task.await {
        tracing::error!("HTTP server task join error: {}", e);
    }

    tracing::info!("Board-service shutting down");
    Ok(())
}

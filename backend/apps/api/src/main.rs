//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use auth::PgAuthRepository;
use auth::middleware::{AuthMiddlewareState, require_auth_session};
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use listings::{LocalStorage, PgListingsRepository, PhotoStorage, SupabaseStorage, listings_router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ApiSettings, MEDIA_ROUTE, StorageSettings};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,listings=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ApiSettings::from_env()?;
    if settings.auth.auth_mode.allows_unverified() {
        tracing::warn!(
            target: "audit",
            "Telegram auth runs in insecure-fallback mode; unsigned init data will be accepted"
        );
    }

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(
                sessions_deleted = sessions,
                "Auth session cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    // Photo storage
    let mut media: Option<ServeDir> = None;
    let storage: Arc<dyn PhotoStorage> = match &settings.storage {
        StorageSettings::Supabase { url, key, bucket } => {
            let supabase = SupabaseStorage::new(url.clone(), key.clone(), bucket.clone())?;
            if let Err(e) = supabase.ensure_bucket().await {
                tracing::warn!(
                    error = %e,
                    bucket = %bucket,
                    "Could not ensure storage bucket, continuing anyway"
                );
            }
            tracing::info!(bucket = %bucket, "Using Supabase photo storage");
            Arc::new(supabase)
        }
        StorageSettings::Local { dir, public_url } => {
            tokio::fs::create_dir_all(dir).await?;
            media = Some(ServeDir::new(dir));
            tracing::info!(
                dir = %dir.display(),
                public_url = %public_url,
                "Using local photo storage"
            );
            Arc::new(LocalStorage::new(dir.clone(), public_url.clone()))
        }
    };

    let auth_config = Arc::new(settings.auth.clone());
    let listings_config = Arc::new(settings.listings.clone());

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Listings require a session
    let session_guard = middleware::from_fn_with_state(
        AuthMiddlewareState::new(PgAuthRepository::new(pool.clone()), auth_config.clone()),
        require_auth_session::<PgAuthRepository>,
    );
    let listings = listings_router(
        PgListingsRepository::new(pool.clone()),
        storage,
        listings_config,
    )
    .route_layer(session_guard);

    // Build router
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/health", get(health))
        .nest(
            "/api/v1/telegram",
            auth::auth_router(PgAuthRepository::new(pool.clone()), auth_config),
        )
        .nest("/api/v1/listings", listings);
    if let Some(media) = media {
        app = app.nest_service(MEDIA_ROUTE, media);
    }
    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

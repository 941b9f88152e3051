//! Listings Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::ListingsConfig;
use crate::domain::repository::ListingsRepository;
use crate::infra::postgres::PgListingsRepository;
use crate::infra::storage::PhotoStorage;
use crate::presentation::handlers::{self, ListingsAppState};

/// Listings routes backed by PostgreSQL; nest under `/api/v1/listings` behind
/// the session middleware.
pub fn listings_router(
    repo: PgListingsRepository,
    storage: Arc<dyn PhotoStorage>,
    config: Arc<ListingsConfig>,
) -> Router {
    listings_router_generic(repo, storage, config)
}

pub fn listings_router_generic<R>(
    repo: R,
    storage: Arc<dyn PhotoStorage>,
    config: Arc<ListingsConfig>,
) -> Router
where
    R: ListingsRepository,
{
    let upload_limit = config.upload_body_limit();
    let state = ListingsAppState {
        repo: Arc::new(repo),
        storage,
        config,
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_listings::<R>).post(handlers::create_listing::<R>),
        )
        .route("/{id}", get(handlers::get_listing::<R>))
        .route(
            "/{id}/photos",
            post(handlers::upload_photos::<R>).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/{id}/moderate", post(handlers::moderate_listing::<R>))
        .with_state(state)
}

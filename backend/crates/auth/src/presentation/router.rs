//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Telegram auth routes backed by PostgreSQL; nest under `/api/v1/telegram`.
pub fn auth_router(repo: PgAuthRepository, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(repo, config)
}

/// Telegram auth routes for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: AuthRepository,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route("/auth", post(handlers::telegram_auth::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/signout/others", post(handlers::sign_out_others::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .route("/me", get(handlers::me::<R>))
        .with_state(state)
}

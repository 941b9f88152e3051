//! Auth Middleware
//!
//! Guards routes owned by other crates: a valid session is resolved into a
//! [`kernel::principal::Principal`] placed in request extensions.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthError;
use crate::presentation::extract::fingerprint_from_parts;

#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: Arc<AuthConfig>) -> Self {
        Self {
            repo: Arc::new(repo),
            config,
        }
    }
}

/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_auth_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    req: Request,
    next: Next,
) -> Response
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let (mut parts, body) = req.into_parts();

    let fingerprint = match fingerprint_from_parts(&parts) {
        Ok(fp) => fp,
        Err(e) => return e.into_response(),
    };

    let Some(token) = platform::cookie::extract_cookie(&parts.headers, &state.config.session_cookie_name)
    else {
        return unauthorized();
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let session = match use_case.get_session(&token, &fingerprint.hash).await {
        Ok(session) => session,
        Err(AuthError::SessionInvalid) => return unauthorized(),
        Err(e) => return e.into_response(),
    };

    parts.extensions.insert(session.principal());
    next.run(Request::from_parts(parts, body)).await
}

fn unauthorized() -> Response {
    let mut response = AuthError::SessionInvalid.to_app_error().into_response();
    response
        .headers_mut()
        .insert("X-Auth-Required", HeaderValue::from_static("true"));
    response
}

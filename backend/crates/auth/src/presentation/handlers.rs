//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, CurrentUserUseCase, SignOutUseCase, TelegramSignInInput,
    TelegramSignInUseCase,
};
use crate::domain::repository::AuthRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    SessionStatusResponse, SignOutOthersResponse, TelegramAuthRequest, TelegramAuthResponse,
    UserProfileResponse,
};
use crate::presentation::extract::Client;

#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Telegram Sign In
// ============================================================================

/// POST /api/v1/telegram/auth
pub async fn telegram_auth<R>(
    State(state): State<AuthAppState<R>>,
    Client(fingerprint): Client,
    Json(req): Json<TelegramAuthRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepository,
{
    let use_case =
        TelegramSignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(
            TelegramSignInInput {
                init_data: req.init_data,
            },
            fingerprint,
        )
        .await?;

    let cookie = state
        .config
        .cookie()
        .build_set_cookie(&output.session_token, state.config.session_ttl.as_secs());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(TelegramAuthResponse {
            ok: true,
            verified: output.verified,
            user: UserProfileResponse::from(&output.user),
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/v1/telegram/signout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: AuthRepository,
{
    if let Some(token) = session_cookie(&headers, &state.config) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared regardless.
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out with unusable session token");
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, state.config.cookie().build_delete_cookie())],
    )
}

/// POST /api/v1/telegram/signout/others
pub async fn sign_out_others<R>(
    State(state): State<AuthAppState<R>>,
    Client(fingerprint): Client,
    headers: HeaderMap,
) -> AuthResult<Json<SignOutOthersResponse>>
where
    R: AuthRepository,
{
    let token = session_cookie(&headers, &state.config).ok_or(AuthError::SessionInvalid)?;

    let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
    let sessions_revoked = use_case.execute_others(&token, &fingerprint.hash).await?;

    Ok(Json(SignOutOthersResponse { sessions_revoked }))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/v1/telegram/status
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    Client(fingerprint): Client,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    R: AuthRepository,
{
    let Some(token) = session_cookie(&headers, &state.config) else {
        return Json(SessionStatusResponse::anonymous());
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(&token, &fingerprint.hash).await {
        Ok(info) => Json(SessionStatusResponse {
            authenticated: true,
            public_id: Some(info.public_id),
            user_role: Some(info.user_role),
            identity_verified: Some(info.identity_verified),
            expires_at_ms: Some(info.expires_at_ms),
        }),
        Err(_) => Json(SessionStatusResponse::anonymous()),
    }
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/v1/telegram/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Client(fingerprint): Client,
    headers: HeaderMap,
) -> AuthResult<Json<UserProfileResponse>>
where
    R: AuthRepository,
{
    let token = session_cookie(&headers, &state.config).ok_or(AuthError::SessionInvalid)?;

    let session = CheckSessionUseCase::new(state.repo.clone(), state.config.clone())
        .get_session(&token, &fingerprint.hash)
        .await?;

    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(&session.user_id)
        .await?;

    Ok(Json(UserProfileResponse::from(&user)))
}

fn session_cookie(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    platform::cookie::extract_cookie(headers, &config.session_cookie_name)
}

//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Telegram Sign In
// ============================================================================

/// Body of `POST /telegram/auth`
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAuthRequest {
    /// Raw `Telegram.WebApp.initData`
    #[serde(alias = "initData")]
    pub init_data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramAuthResponse {
    pub ok: bool,
    pub verified: bool,
    pub user: UserProfileResponse,
}

// ============================================================================
// User profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub public_id: String,
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    pub is_premium: Option<bool>,
    pub photo_url: Option<String>,
    pub role: String,
    /// Unix ms
    pub last_login_at: Option<i64>,
}

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            public_id: user.public_id.to_string(),
            telegram_id: user.telegram_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            language_code: user.language_code.clone(),
            is_premium: user.is_premium,
            photo_url: user.photo_url.clone(),
            role: user.user_role.code().to_string(),
            last_login_at: user.last_login_at.map(|t| t.timestamp_millis()),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub public_id: Option<String>,
    pub user_role: Option<String>,
    pub identity_verified: Option<bool>,
    pub expires_at_ms: Option<i64>,
}

impl SessionStatusResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            public_id: None,
            user_role: None,
            identity_verified: None,
            expires_at_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutOthersResponse {
    pub sessions_revoked: u64,
}

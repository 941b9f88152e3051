//! User Entity
//!
//! A marketplace account. Accounts are keyed by Telegram id and created on
//! first sign-in; profile fields mirror what Telegram last reported.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::principal::Role;

use crate::domain::value_object::{public_id::PublicId, telegram_user::ParsedUser};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Nanoid exposed in API responses instead of the UUID
    pub public_id: PublicId,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_premium: Option<bool>,
    pub photo_url: Option<String>,
    pub user_role: Role,
    /// Deactivated accounts cannot open sessions.
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New student account for a Telegram user seen for the first time.
    pub fn from_telegram(telegram_user: &ParsedUser) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            telegram_id: telegram_user.id,
            username: telegram_user.username.clone(),
            first_name: telegram_user.first_name.clone(),
            last_name: telegram_user.last_name.clone(),
            language_code: telegram_user.language_code.clone(),
            is_premium: telegram_user.is_premium,
            photo_url: telegram_user.photo_url.clone(),
            user_role: Role::default(),
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy profile fields from a fresh Telegram payload.
    /// Returns whether anything changed.
    pub fn apply_profile(&mut self, telegram_user: &ParsedUser) -> bool {
        let changed = self.username != telegram_user.username
            || self.first_name != telegram_user.first_name
            || self.last_name != telegram_user.last_name
            || self.language_code != telegram_user.language_code
            || self.is_premium != telegram_user.is_premium
            || self.photo_url != telegram_user.photo_url;

        if changed {
            self.username = telegram_user.username.clone();
            self.first_name = telegram_user.first_name.clone();
            self.last_name = telegram_user.last_name.clone();
            self.language_code = telegram_user.language_code.clone();
            self.is_premium = telegram_user.is_premium;
            self.photo_url = telegram_user.photo_url.clone();
            self.updated_at = Utc::now();
        }

        changed
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }
}

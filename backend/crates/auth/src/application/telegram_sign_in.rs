//! Telegram Sign In Use Case
//!
//! Verifies Mini App init data, creates or refreshes the account keyed by
//! Telegram id and opens a session.

use std::sync::Arc;

use chrono::Utc;
use platform::client::ClientFingerprint;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::{AuthSession, NewSession};
use crate::domain::entity::user::User;
use crate::domain::init_data::{InitData, InitDataError};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::telegram_user::ParsedUser;
use crate::error::{AuthError, AuthResult};

/// Tolerated clock skew for `auth_date` values from the future (seconds).
const AUTH_DATE_FUTURE_SKEW_SECS: i64 = 300;

pub struct TelegramSignInInput {
    /// Raw `Telegram.WebApp.initData`
    pub init_data: String,
}

pub struct TelegramSignInOutput {
    pub session_token: String,
    pub user: User,
    pub telegram_user: ParsedUser,
    /// `false` only when the insecure fallback accepted the payload
    pub verified: bool,
}

pub struct TelegramSignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> TelegramSignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: TelegramSignInInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<TelegramSignInOutput> {
        let init_data = InitData::parse(&input.init_data);

        let (telegram_user, verified) = self.authenticate(&init_data)?;
        if verified {
            self.check_freshness(&init_data)?;
        }

        let mut user = self.find_or_create_user(&telegram_user).await?;
        if !user.can_login() {
            tracing::info!(public_id = %user.public_id, "Sign-in attempt on disabled account");
            return Err(AuthError::AccountDisabled);
        }

        user.record_login();
        self.user_repo.update(&user).await?;

        let session = AuthSession::new(
            NewSession {
                user_id: user.user_id,
                public_id: user.public_id,
                user_role: user.user_role,
                identity_verified: verified,
                fingerprint_hash: fingerprint.hash_vec(),
                client_ip: fingerprint.ip_string(),
                user_agent: fingerprint.user_agent.clone(),
            },
            self.config.session_ttl_chrono(),
        );
        self.session_repo.create(&session).await?;

        let session_token = session_token::issue(session.session_id, &self.config.session_secret);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            verified,
            "User signed in with Telegram"
        );

        Ok(TelegramSignInOutput {
            session_token,
            user,
            telegram_user,
            verified,
        })
    }

    /// Returns the user and whether the signature was verified.
    fn authenticate(&self, init_data: &InitData) -> AuthResult<(ParsedUser, bool)> {
        match init_data.verify(self.config.bot_token.expose()) {
            Ok(user) => Ok((user, true)),
            Err(InitDataError::AuthInvalid) if self.config.auth_mode.allows_unverified() => {
                let unverified = init_data.user_unverified()?;
                tracing::warn!(
                    target: "audit",
                    telegram_id = unverified.telegram_id(),
                    "Accepted Telegram init data without a valid signature (insecure fallback)"
                );
                Ok((unverified.into_unchecked(), false))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn check_freshness(&self, init_data: &InitData) -> AuthResult<()> {
        let Some(max_age) = self.config.init_data_max_age else {
            return Ok(());
        };

        let auth_date = init_data.auth_date().ok_or(AuthError::InitDataExpired)?;
        let age = Utc::now()
            .timestamp()
            .checked_sub(auth_date)
            .ok_or(AuthError::InitDataExpired)?;
        let max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);

        if age > max_age_secs || age < -AUTH_DATE_FUTURE_SKEW_SECS {
            tracing::debug!(auth_date, age, "Stale Telegram init data");
            return Err(AuthError::InitDataExpired);
        }
        Ok(())
    }

    async fn find_or_create_user(&self, telegram_user: &ParsedUser) -> AuthResult<User> {
        match self.user_repo.find_by_telegram_id(telegram_user.id).await? {
            Some(mut user) => {
                if user.apply_profile(telegram_user) {
                    tracing::debug!(public_id = %user.public_id, "Refreshed Telegram profile");
                }
                Ok(user)
            }
            None => {
                // Upsert: a concurrent first sign-in may have inserted the row.
                let user = self
                    .user_repo
                    .upsert(&User::from_telegram(telegram_user))
                    .await?;
                tracing::info!(public_id = %user.public_id, "Registered new Telegram user");
                Ok(user)
            }
        }
    }
}

//! Auth configuration

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::secret::SecretString;

pub use platform::cookie::SameSite;

/// How to treat init data whose signature does not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TelegramAuthMode {
    /// Reject it.
    #[default]
    Strict,
    /// Accept the claimed user anyway, mark the session unverified and
    /// emit an audit event. Local development only.
    InsecureFallback,
}

impl TelegramAuthMode {
    /// `strict` or `insecure-fallback`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "insecure-fallback" | "insecure_fallback" => Some(Self::InsecureFallback),
            _ => None,
        }
    }

    pub fn allows_unverified(&self) -> bool {
        matches!(self, Self::InsecureFallback)
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Telegram bot token; keys the init data signature
    pub bot_token: SecretString,
    pub auth_mode: TelegramAuthMode,
    /// Maximum age of signed `auth_date`; `None` disables the check
    pub init_data_max_age: Option<Duration>,
    pub session_cookie_name: String,
    /// HMAC key for session tokens (32 bytes)
    pub session_secret: [u8; 32],
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bot_token: SecretString::new(""),
            auth_mode: TelegramAuthMode::Strict,
            init_data_max_age: Some(Duration::from_secs(24 * 3600)),
            session_cookie_name: "mp_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(7 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::None,
        }
    }
}

impl AuthConfig {
    /// Random session secret; sessions do not survive a restart.
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Random secret, plain-HTTP cookies.
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secret()
        }
    }

    pub fn with_bot_token(mut self, bot_token: impl Into<String>) -> Self {
        self.bot_token = SecretString::new(bot_token);
        self
    }

    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }

    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or_else(|_| chrono::Duration::days(7))
    }
}

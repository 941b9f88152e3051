//! Server settings
//!
//! Everything the binary needs from the environment, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::{AuthConfig, TelegramAuthMode};
use base64::Engine;
use base64::engine::general_purpose;
use listings::ListingsConfig;
use platform::secret::SecretString;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_BUCKET: &str = "listing-photos";
const DEFAULT_LOCAL_DIR: &str = "./media";

/// Path the local storage directory is served under
pub const MEDIA_ROUTE: &str = "/media";

#[derive(Debug, Clone)]
pub enum StorageSettings {
    Supabase {
        url: String,
        key: SecretString,
        bucket: String,
    },
    Local {
        dir: PathBuf,
        public_url: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub listings: ListingsConfig,
    pub storage: StorageSettings,
}

impl ApiSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), !cfg!(debug_assertions))
    }

    /// `release` demands an explicit session secret and secure cookies.
    pub fn from_lookup<F>(lookup: F, release: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bot_token = var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let bind_addr: SocketAddr = var("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        // Auth
        let mut auth = match var("AUTH_SESSION_SECRET") {
            Some(secret) => AuthConfig {
                session_secret: decode_secret(&secret)?,
                ..base_auth_config(release)
            },
            None if release => bail!("AUTH_SESSION_SECRET must be set in production"),
            None => base_auth_config(release),
        }
        .with_bot_token(bot_token);

        if let Some(mode) = var("TELEGRAM_AUTH_MODE") {
            auth.auth_mode = TelegramAuthMode::parse(&mode)
                .with_context(|| format!("Unknown TELEGRAM_AUTH_MODE: {mode}"))?;
        }
        if let Some(secs) = var("TELEGRAM_INIT_DATA_MAX_AGE_SECS") {
            let secs: u64 = secs
                .parse()
                .context("TELEGRAM_INIT_DATA_MAX_AGE_SECS must be a number of seconds")?;
            auth.init_data_max_age = (secs > 0).then(|| Duration::from_secs(secs));
        }

        // Storage
        let backend = var("STORAGE_BACKEND").map(|b| b.to_ascii_lowercase());
        let use_supabase = match backend.as_deref() {
            Some("supabase") => true,
            Some("local") => false,
            Some(other) => bail!("Unknown STORAGE_BACKEND: {other}"),
            None => var("SUPABASE_URL").is_some(),
        };

        let storage = if use_supabase {
            StorageSettings::Supabase {
                url: var("SUPABASE_URL").context("SUPABASE_URL must be set")?,
                key: SecretString::new(var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?),
                bucket: var("SUPABASE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            }
        } else {
            StorageSettings::Local {
                dir: PathBuf::from(
                    var("LOCAL_STORAGE_DIR").unwrap_or_else(|| DEFAULT_LOCAL_DIR.to_string()),
                ),
                public_url: var("LOCAL_STORAGE_PUBLIC_URL").unwrap_or_else(|| {
                    format!("http://localhost:{}{MEDIA_ROUTE}", bind_addr.port())
                }),
            }
        };

        let listings = if release {
            ListingsConfig::default()
        } else {
            ListingsConfig::development()
        };

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            auth,
            listings,
            storage,
        })
    }
}

fn base_auth_config(release: bool) -> AuthConfig {
    if release {
        AuthConfig::with_random_secret()
    } else {
        AuthConfig::development()
    }
}

/// Base64 (standard alphabet), exactly 32 bytes.
fn decode_secret(value: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(value)
        .context("AUTH_SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| {
            anyhow::anyhow!("AUTH_SESSION_SECRET must decode to 32 bytes, got {}", bytes.len())
        })
}

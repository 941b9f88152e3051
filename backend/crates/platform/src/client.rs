//! Client identification
//!
//! Sessions are bound to a fingerprint of the client so a stolen cookie is
//! useless from a different browser.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

use crate::crypto::sha256;

#[derive(Debug, Clone)]
pub struct ClientFingerprint {
    /// SHA-256 of the User-Agent header
    pub hash: [u8; 32],
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    /// Fingerprint the request. Fails when User-Agent is missing or not
    /// visible ASCII.
    pub fn from_headers(
        headers: &HeaderMap,
        direct_ip: Option<IpAddr>,
    ) -> Result<Self, FingerprintError> {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .filter(|ua| !ua.trim().is_empty())
            .ok_or_else(|| FingerprintError::MissingHeader("User-Agent".to_string()))?;

        Ok(Self {
            hash: sha256(user_agent.as_bytes()),
            ip: client_ip(headers, direct_ip),
            user_agent: Some(user_agent.to_string()),
        })
    }

    pub fn hash_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FingerprintError {
    #[error("Missing required header: {0}")]
    MissingHeader(String),
}

/// Client IP behind a reverse proxy: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the socket address.
pub fn client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or(direct_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_ua(ua: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(ua));
        headers
    }

    #[test]
    fn test_fingerprint_is_stable_per_user_agent() {
        let a = ClientFingerprint::from_headers(&headers_with_ua("TelegramWebView/1"), None)
            .unwrap();
        let b = ClientFingerprint::from_headers(&headers_with_ua("TelegramWebView/1"), None)
            .unwrap();
        let c = ClientFingerprint::from_headers(&headers_with_ua("TelegramWebView/2"), None)
            .unwrap();

        assert_eq!(a.hash, b.hash);
        assert_ne!(a.hash, c.hash);
        assert_eq!(a.user_agent.as_deref(), Some("TelegramWebView/1"));
    }

    #[test]
    fn test_missing_or_blank_user_agent() {
        let result = ClientFingerprint::from_headers(&HeaderMap::new(), None);
        assert!(matches!(result, Err(FingerprintError::MissingHeader(_))));

        let result = ClientFingerprint::from_headers(&headers_with_ua("   "), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_ip_precedence() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some(direct)), Some(direct));

        headers.insert("x-real-ip", HeaderValue::from_static("10.1.1.1"));
        assert_eq!(client_ip(&headers, Some(direct)), "10.1.1.1".parse().ok());

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, Some(direct)), "192.168.1.1".parse().ok());
    }

    #[test]
    fn test_garbage_forwarded_header_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        assert_eq!(client_ip(&headers, None), None);
    }
}

//! Cookie helpers
//!
//! Builds `Set-Cookie` values for the session cookie and reads cookies back
//! out of request headers.

use axum::http::{HeaderMap, header};

/// SameSite policy. Mini Apps run inside Telegram's webview on a different
/// site than the API, so deployments usually pick `None` + `Secure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    /// Parse `strict` / `lax` / `none`, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    /// `Set-Cookie` value carrying `value` for `max_age_secs` seconds.
    pub fn build_set_cookie(&self, value: &str, max_age_secs: u64) -> String {
        let mut parts = vec![
            format!("{}={}", self.name, value),
            "HttpOnly".to_string(),
            format!("Path={}", self.path),
            format!("Max-Age={}", max_age_secs),
        ];
        self.push_policy(&mut parts);
        parts.join("; ")
    }

    /// `Set-Cookie` value that removes the cookie.
    pub fn build_delete_cookie(&self) -> String {
        let mut parts = vec![
            format!("{}=", self.name),
            "HttpOnly".to_string(),
            format!("Path={}", self.path),
            "Max-Age=0".to_string(),
            "Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
        ];
        self.push_policy(&mut parts);
        parts.join("; ")
    }

    fn push_policy(&self, parts: &mut Vec<String>) {
        // Browsers drop SameSite=None cookies that are not Secure.
        if self.secure || self.same_site == SameSite::None {
            parts.push("Secure".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
    }
}

/// Read one cookie value from the `Cookie` header(s).
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(same_site: SameSite, secure: bool) -> CookieConfig {
        CookieConfig {
            name: "mp_session".to_string(),
            secure,
            same_site,
            path: "/".to_string(),
        }
    }

    #[test]
    fn test_build_set_cookie() {
        let cookie = config(SameSite::Lax, true).build_set_cookie("tok", 3600);
        assert!(cookie.starts_with("mp_session=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_same_site_none_forces_secure() {
        let cookie = config(SameSite::None, false).build_set_cookie("tok", 60);
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));

        let cookie = config(SameSite::Lax, false).build_set_cookie("tok", 60);
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_build_delete_cookie() {
        let cookie = config(SameSite::Strict, true).build_delete_cookie();
        assert!(cookie.starts_with("mp_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("NONE"), Some(SameSite::None));
        assert_eq!(SameSite::parse(" lax "), Some(SameSite::Lax));
        assert_eq!(SameSite::parse("strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::parse("sometimes"), None);
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; mp_session=abc.def; empty="),
        );

        assert_eq!(
            extract_cookie(&headers, "mp_session"),
            Some("abc.def".to_string())
        );
        assert_eq!(extract_cookie(&headers, "theme"), Some("dark".to_string()));
        assert_eq!(extract_cookie(&headers, "empty"), None);
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("mp_session=xyz"));
        assert_eq!(
            extract_cookie(&headers, "mp_session"),
            Some("xyz".to_string())
        );
    }
}

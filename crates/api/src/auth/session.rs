//! Session tokens and the session cookie.
//!
//! A session token is an opaque random string handed to the browser in an
//! `HttpOnly` cookie. Only its SHA-256 hash is stored server-side so a
//! database leak does not expose live sessions.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::AuthConfig;

/// Generate a random session token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext is
/// sent to the client; only the hash is persisted.
pub fn generate_session_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Read the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value that installs a session token for the configured TTL.
pub fn session_cookie(config: &AuthConfig, token: &str) -> String {
    let max_age = config.session_ttl_hours * 3600;
    cookie_with(config, token, max_age)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_session_cookie(config: &AuthConfig) -> String {
    cookie_with(config, "", 0)
}

fn cookie_with(config: &AuthConfig, value: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        config.cookie_name
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn test_config(secure: bool) -> AuthConfig {
        AuthConfig {
            username: "admin".into(),
            password: "admin123".into(),
            session_ttl_hours: 24,
            cookie_name: "locker_session".into(),
            cookie_secure: secure,
        }
    }

    #[test]
    fn test_token_hash_matches() {
        let (plaintext, hash) = generate_session_token();

        assert_eq!(hash, hash_session_token(&plaintext));
        // SHA-256 hex digest.
        assert_eq!(hash.len(), 64);
        assert_eq!(plaintext.len(), 64);
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_session_token();
        let (b, _) = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; locker_session=tok123; lang=en"),
        );

        assert_eq!(
            token_from_headers(&headers, "locker_session").as_deref(),
            Some("tok123")
        );
        assert_eq!(token_from_headers(&headers, "other"), None);
    }

    #[test]
    fn test_token_found_in_second_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("locker_session=abc"));

        assert_eq!(
            token_from_headers(&headers, "locker_session").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_empty_cookie_value_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("locker_session="));
        assert_eq!(token_from_headers(&headers, "locker_session"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&test_config(false), "tok");
        assert_eq!(
            cookie,
            "locker_session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400"
        );

        let secure = session_cookie(&test_config(true), "tok");
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let cookie = expired_session_cookie(&test_config(false));
        assert!(cookie.starts_with("locker_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}

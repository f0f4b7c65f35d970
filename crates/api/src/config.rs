use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running on a single office machine.
/// In production, override via environment variables or a `.env` file.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://lockers.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted size of a spreadsheet upload in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Directory with the browser frontend, served for non-API paths when set.
    pub static_dir: Option<PathBuf>,
    /// Admin credential and session cookie settings.
    pub auth: AuthConfig,
}

/// Admin login and session cookie settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The single admin username.
    pub username: String,
    /// The single admin password, compared as plain text.
    pub password: String,
    /// Session lifetime in hours (default: `24`).
    pub session_ttl_hours: i64,
    /// Name of the session cookie (default: `locker_session`).
    pub cookie_name: String,
    /// Whether to mark the cookie `Secure` (default: `false`).
    pub cookie_secure: bool,
}

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://lockers.db";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5000,http://127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
/// 366 days.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;
const DEFAULT_COOKIE_NAME: &str = "locker_session";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                        |
    /// |------------------------|------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                      |
    /// | `PORT`                 | `5000`                                         |
    /// | `DATABASE_URL`         | `sqlite://lockers.db`                          |
    /// | `CORS_ORIGINS`         | `http://localhost:5000,http://127.0.0.1:5000`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                           |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                                     |
    /// | `STATIC_DIR`           | unset                                          |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable does not parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            static_dir,
            auth: AuthConfig::from_env(),
        }
    }
}

impl AuthConfig {
    /// Load the admin credential and cookie settings.
    ///
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `ADMIN_USERNAME`        | `admin`          |
    /// | `ADMIN_PASSWORD`        | `admin123`       |
    /// | `SESSION_TTL_HOURS`     | `24`             |
    /// | `SESSION_COOKIE_NAME`   | `locker_session` |
    /// | `SESSION_COOKIE_SECURE` | `false`          |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_TTL_HOURS` is not an integer in `1..=8784` (one
    /// year) or the password is empty.
    pub fn from_env() -> Self {
        let username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.into());
        let password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into());
        assert!(!password.is_empty(), "ADMIN_PASSWORD must not be empty");

        let session_ttl_hours = parse_session_ttl(
            &std::env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| DEFAULT_SESSION_TTL_HOURS.to_string()),
        )
        .unwrap_or_else(|msg| panic!("{msg}"));

        let cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into());

        let cookie_secure = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            username,
            password,
            session_ttl_hours,
            cookie_name,
            cookie_secure,
        }
    }

    /// Check submitted credentials against the configured pair.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Parse and range-check a session lifetime in hours.
fn parse_session_ttl(raw: &str) -> Result<i64, String> {
    let hours: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("SESSION_TTL_HOURS must be an integer, got '{raw}'"))?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(format!(
            "SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}"
        ));
    }
    Ok(hours)
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Interpret common truthy spellings (`1`, `true`, `yes`, `on`).
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

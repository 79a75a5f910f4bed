use std::fmt::Display;
use std::str::FromStr;

use rollcall_core::attendance_rules::offset_from_minutes;

use crate::auth::jwt::JwtConfig;

/// Default number of assignment writes a bulk request runs at once.
pub const DEFAULT_BULK_ASSIGN_CONCURRENCY: usize = 8;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Time allowed for closing the database pool after the server stops
    /// accepting connections.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// The organisation's fixed UTC offset in minutes. Shift times and
    /// attendance days are interpreted in this local time.
    pub org_utc_offset_minutes: i32,
    /// Optional JSON file extending or overriding the built-in holidays.
    pub holiday_calendar_path: Option<String>,
    /// Concurrent writes per bulk assignment request.
    pub bulk_assign_concurrency: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                    |
    /// | `ORG_UTC_OFFSET_MINUTES`  | `0`                     |
    /// | `HOLIDAY_CALENDAR_PATH`   | unset                   |
    /// | `BULK_ASSIGN_CONCURRENCY` | `8`                     |
    ///
    /// JWT settings come from [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let org_utc_offset_minutes: i32 = env_or("ORG_UTC_OFFSET_MINUTES", 0);
        if let Err(e) = offset_from_minutes(org_utc_offset_minutes) {
            panic!("ORG_UTC_OFFSET_MINUTES is out of range: {e}");
        }

        let bulk_assign_concurrency: usize =
            env_or("BULK_ASSIGN_CONCURRENCY", DEFAULT_BULK_ASSIGN_CONCURRENCY);
        assert!(bulk_assign_concurrency > 0, "BULK_ASSIGN_CONCURRENCY must be positive");

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            org_utc_offset_minutes,
            holiday_calendar_path: std::env::var("HOLIDAY_CALENDAR_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            bulk_assign_concurrency,
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset.
///
/// Panics when the variable is set but does not parse.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

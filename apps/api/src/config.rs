// Runtime configuration
// Read from the environment (after `.env` is loaded by main)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::pagination::{PaginationPolicy, SortFallback, DEFAULT_MAX_LIMIT};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://league.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// How the shared-secret gate answers a wrong token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthPolicy {
    /// Answer a wrong token with 401 instead of 400
    pub mismatch_unauthorized: bool,
}

/// Pagination rules for each resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationSettings {
    pub teams: PaginationPolicy,
    pub players: PaginationPolicy,
    pub users: PaginationPolicy,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub host: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
    pub auth: AuthPolicy,
    pub pagination: PaginationSettings,
    pub reconcile_on_startup: bool,
}

impl Config {
    /// Configuration with defaults for everything but the connection and secret
    pub fn new(database_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            secret_key: secret_key.into(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            auth: AuthPolicy::default(),
            pagination: PaginationSettings::default(),
            reconcile_on_startup: false,
        }
    }

    /// Reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup
    ///
    /// # Keys
    /// * `SECRET_KEY` - shared API token (required)
    /// * `DATABASE_URL`, `HOST`, `PORT`, `PUBLIC_DIR`
    /// * `MAX_PAGE_LIMIT` - `0` disables the cap
    /// * `TEAM_SORT_FALLBACK`, `PLAYER_SORT_FALLBACK`, `USER_SORT_FALLBACK` -
    ///   `ascending` or `unsorted`
    /// * `AUTH_MISMATCH_UNAUTHORIZED`, `RECONCILE_ON_STARTUP` - booleans
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret_key = lookup("SECRET_KEY")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, secret_key);

        if let Some(host) = parse_var(&lookup, "HOST", |v| IpAddr::from_str(v))? {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PORT", |v| v.parse::<u16>())? {
            config.port = port;
        }
        if let Some(dir) = lookup("PUBLIC_DIR") {
            config.public_dir = PathBuf::from(dir);
        }

        let max_limit = parse_var(&lookup, "MAX_PAGE_LIMIT", |v| v.parse::<u32>())?
            .unwrap_or(DEFAULT_MAX_LIMIT);
        let max_limit = (max_limit > 0).then_some(max_limit);

        let policy = |key: &'static str| -> Result<PaginationPolicy, ConfigError> {
            let fallback = parse_var(&lookup, key, SortFallback::from_str)?.unwrap_or_default();
            Ok(PaginationPolicy {
                max_limit,
                ..PaginationPolicy::default()
            }
            .with_sort_fallback(fallback))
        };
        config.pagination = PaginationSettings {
            teams: policy("TEAM_SORT_FALLBACK")?,
            players: policy("PLAYER_SORT_FALLBACK")?,
            users: policy("USER_SORT_FALLBACK")?,
        };

        config.auth.mismatch_unauthorized =
            parse_var(&lookup, "AUTH_MISMATCH_UNAUTHORIZED", parse_bool)?.unwrap_or(false);
        config.reconcile_on_startup =
            parse_var(&lookup, "RECONCILE_ON_STARTUP", parse_bool)?.unwrap_or(false);

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T, E: ToString>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse(value.trim())
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key,
                value,
                reason: e.to_string(),
            }),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {}", other)),
    }
}

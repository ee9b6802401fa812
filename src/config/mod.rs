//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `LABELSCORE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL, DEFAULT_EXTERNAL_MAX_ATTEMPTS,
    DEFAULT_EXTERNAL_TIMEOUT, DEFAULT_RETRY_BASE_DELAY,
};
use crate::resilience::RetryPolicy;
use crate::resolver::DEFAULT_NUTRITION_DB_URL;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LABELSCORE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the cache mirror. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Base URL of the nutrition database. Default: Open Food Facts.
    pub nutrition_db_url: String,

    /// Per-attempt timeout for external lookups. Default: 8s.
    pub external_timeout: Duration,

    /// Attempt budget for retryable external failures. Default: `3`.
    pub external_max_attempts: u32,

    /// Delay before the first retry; doubles per attempt. Default: 1s.
    pub retry_base_delay: Duration,

    /// Lifetime of cached resolutions. Default: 24h.
    pub cache_ttl: Duration,

    /// Max entries in the resolution cache. Default: `500`.
    pub cache_max_entries: usize,

    /// Whether the external database tier is enabled. Default: `true`.
    pub external_enabled: bool,

    /// Whether the cache is mirrored to `storage_path`. Default: `true`.
    pub persist_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data"),
            nutrition_db_url: DEFAULT_NUTRITION_DB_URL.to_string(),
            external_timeout: DEFAULT_EXTERNAL_TIMEOUT,
            external_max_attempts: DEFAULT_EXTERNAL_MAX_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            external_enabled: true,
            persist_cache: true,
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "LABELSCORE_PORT";
    const ENV_BIND_ADDR: &'static str = "LABELSCORE_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "LABELSCORE_STORAGE_PATH";
    const ENV_NUTRITION_DB_URL: &'static str = "LABELSCORE_NUTRITION_DB_URL";
    const ENV_EXTERNAL_TIMEOUT_SECS: &'static str = "LABELSCORE_EXTERNAL_TIMEOUT_SECS";
    const ENV_EXTERNAL_MAX_ATTEMPTS: &'static str = "LABELSCORE_EXTERNAL_MAX_ATTEMPTS";
    const ENV_RETRY_BASE_DELAY_MS: &'static str = "LABELSCORE_RETRY_BASE_DELAY_MS";
    const ENV_CACHE_TTL_SECS: &'static str = "LABELSCORE_CACHE_TTL_SECS";
    const ENV_CACHE_MAX_ENTRIES: &'static str = "LABELSCORE_CACHE_MAX_ENTRIES";
    const ENV_EXTERNAL_ENABLED: &'static str = "LABELSCORE_EXTERNAL_ENABLED";
    const ENV_PERSIST_CACHE: &'static str = "LABELSCORE_PERSIST_CACHE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let nutrition_db_url =
            Self::parse_string_from_env(Self::ENV_NUTRITION_DB_URL, defaults.nutrition_db_url);
        let external_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_EXTERNAL_TIMEOUT_SECS,
            defaults.external_timeout.as_secs(),
        ));
        let external_max_attempts = Self::parse_u64_from_env(
            Self::ENV_EXTERNAL_MAX_ATTEMPTS,
            u64::from(defaults.external_max_attempts),
        )
        .try_into()
        .unwrap_or(u32::MAX);
        let retry_base_delay = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_RETRY_BASE_DELAY_MS,
            defaults.retry_base_delay.as_millis().try_into().unwrap_or(u64::MAX),
        ));
        let cache_ttl = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        ));
        let cache_max_entries = Self::parse_u64_from_env(
            Self::ENV_CACHE_MAX_ENTRIES,
            defaults.cache_max_entries as u64,
        )
        .try_into()
        .unwrap_or(usize::MAX);
        let external_enabled =
            Self::parse_bool_from_env(Self::ENV_EXTERNAL_ENABLED, defaults.external_enabled)?;
        let persist_cache =
            Self::parse_bool_from_env(Self::ENV_PERSIST_CACHE, defaults.persist_cache)?;

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            nutrition_db_url,
            external_timeout,
            external_max_attempts,
            retry_base_delay,
            cache_ttl,
            cache_max_entries,
            external_enabled,
            persist_cache,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if self.external_enabled {
            let url = self.nutrition_db_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    name: Self::ENV_NUTRITION_DB_URL,
                    value: self.nutrition_db_url.clone(),
                    reason: "must be an http(s) URL",
                });
            }
        }

        if self.external_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EXTERNAL_TIMEOUT_SECS,
                value: "0".to_string(),
                reason: "must be at least 1 second",
            });
        }

        if self.external_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EXTERNAL_MAX_ATTEMPTS,
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }

        if self.cache_max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CACHE_MAX_ENTRIES,
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Retry policy for the external tier.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .max_attempts(self.external_max_attempts)
            .base_delay(self.retry_base_delay)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Ok(value) = env::var(var_name) else {
            return Ok(default);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                name: var_name,
                value,
            }),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

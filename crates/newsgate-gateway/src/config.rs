//! Startup configuration.
//!
//! [`GatewayConfig`] is built exactly once, before the server starts, and is
//! passed by value or reference to every component that needs it. Nothing
//! reads the environment after startup.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `API_PORT` | `8080` | TCP port to listen on. |
//! | `NEWS_SERVICE_URL` | `http://news:8081` | Content store base URL. |
//! | `COMMENTS_SERVICE_URL` | `http://comments:8082` | Discussion store base URL. |
//! | `VERIFICATION_SERVICE_URL` | `http://verification:8083` | Validation service base URL. |
//! | `UPSTREAM_TIMEOUT_MS` | `5000` | Deadline applied to every upstream call. |
//! | `ERROR_SINK_CAPACITY` | `1024` | Bounded diagnostic queue length. |
//! | `ERROR_SINK_POLICY` | `drop` | `drop` or `block` when the queue is full. |
//! | `LOG_FORMAT` | `text` | `text` or `json`. |

use crate::sink::{ErrorSinkConfig, OverflowPolicy};
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Base URLs of the three dependencies, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    pub news: String,
    pub comments: String,
    pub verification: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            news: "http://news:8081".to_string(),
            comments: "http://comments:8082".to_string(),
            verification: "http://verification:8083".to_string(),
        }
    }
}

/// Immutable runtime configuration of the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    pub upstreams: UpstreamEndpoints,
    /// Deadline for each individual upstream call.
    pub upstream_timeout: Duration,
    pub error_sink: ErrorSinkConfig,
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            upstreams: UpstreamEndpoints::default(),
            upstream_timeout: Duration::from_millis(5_000),
            error_sink: ErrorSinkConfig::default(),
            log_format: LogFormat::Text,
        }
    }
}

impl GatewayConfig {
    /// Read and validate the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys take their
    /// default; set keys must be valid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GatewayConfig::default();

        let port = match get("API_PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(0) => return Err(ConfigError::invalid("API_PORT", &raw, "port must be non-zero")),
                Ok(p) => p,
                Err(e) => return Err(ConfigError::invalid("API_PORT", &raw, e)),
            },
            None => defaults.port,
        };

        let upstreams = UpstreamEndpoints {
            news: base_url("NEWS_SERVICE_URL", get("NEWS_SERVICE_URL"), defaults.upstreams.news)?,
            comments: base_url(
                "COMMENTS_SERVICE_URL",
                get("COMMENTS_SERVICE_URL"),
                defaults.upstreams.comments,
            )?,
            verification: base_url(
                "VERIFICATION_SERVICE_URL",
                get("VERIFICATION_SERVICE_URL"),
                defaults.upstreams.verification,
            )?,
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::invalid(
                        "UPSTREAM_TIMEOUT_MS",
                        &raw,
                        "timeout must be positive",
                    ));
                }
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => return Err(ConfigError::invalid("UPSTREAM_TIMEOUT_MS", &raw, e)),
            },
            None => defaults.upstream_timeout,
        };

        let capacity = match get("ERROR_SINK_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::invalid(
                        "ERROR_SINK_CAPACITY",
                        &raw,
                        "capacity must be positive",
                    ));
                }
                Ok(n) => n,
                Err(e) => return Err(ConfigError::invalid("ERROR_SINK_CAPACITY", &raw, e)),
            },
            None => defaults.error_sink.capacity,
        };

        let policy = match get("ERROR_SINK_POLICY") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "drop" => OverflowPolicy::DropNewest,
                "block" => OverflowPolicy::Block,
                _ => {
                    return Err(ConfigError::invalid(
                        "ERROR_SINK_POLICY",
                        &raw,
                        "expected 'drop' or 'block'",
                    ));
                }
            },
            None => defaults.error_sink.policy,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::invalid(
                        "LOG_FORMAT",
                        &raw,
                        "expected 'text' or 'json'",
                    ));
                }
            },
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            upstreams,
            upstream_timeout,
            error_sink: ErrorSinkConfig { capacity, policy },
            log_format,
        })
    }
}

fn base_url(key: &'static str, raw: Option<String>, default: String) -> Result<String, ConfigError> {
    let raw = raw.unwrap_or(default);
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::invalid(key, &raw, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(key, &raw, "scheme must be http or https"));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

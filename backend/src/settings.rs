//! Service configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `NAMECHECK_*` environment variables,
//! and configuration files. Every field is optional; accessors apply defaults
//! and reject values the service cannot run with.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{BulkCheckConfig, RateLimitConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_VALIDATION_ENDPOINT: &str = "https://auth.roblox.com/v1/usernames/validate";
const DEFAULT_LOOKUP_ENDPOINT: &str = "https://users.roblox.com/v1/usernames/users";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_RATE_LIMIT_MAX_CLIENTS: usize = 10_000;
const DEFAULT_BULK_PACING_MS: u64 = 200;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address {value:?}: {reason}")]
    BindAddr { value: String, reason: String },
    /// An upstream endpoint is not an absolute http(s) URL.
    #[error("invalid {field} {value:?}: {reason}")]
    Endpoint {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// A value that must be positive was zero.
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Configuration values for the namecheck service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NAMECHECK")]
pub struct NamecheckSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Primary validation endpoint URL.
    pub validation_endpoint: Option<String>,
    /// Fallback lookup endpoint URL.
    pub lookup_endpoint: Option<String>,
    /// Per-call upstream timeout in seconds.
    pub upstream_timeout_secs: Option<u64>,
    /// Requests admitted per client per window.
    pub rate_limit_max_requests: Option<u32>,
    /// Rate limit window length in seconds.
    pub rate_limit_window_secs: Option<u64>,
    /// Most client windows tracked at once.
    pub rate_limit_max_clients: Option<usize>,
    /// Pause between bulk resolutions in milliseconds.
    pub bulk_pacing_ms: Option<u64>,
    /// PostgreSQL URL; history stays in memory when unset.
    pub database_url: Option<String>,
    /// Key clients by `Forwarded`/`X-Forwarded-For` instead of the peer
    /// address. Enable only behind a proxy that overwrites those headers.
    pub trust_forwarded_headers: Option<bool>,
}

impl NamecheckSettings {
    /// Return the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Return the primary validation endpoint.
    ///
    /// # Errors
    /// [`SettingsError::Endpoint`] when the URL is malformed.
    pub fn validation_endpoint(&self) -> Result<Url, SettingsError> {
        parse_endpoint(
            "validation_endpoint",
            self.validation_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_VALIDATION_ENDPOINT),
        )
    }

    /// Return the fallback lookup endpoint.
    ///
    /// # Errors
    /// [`SettingsError::Endpoint`] when the URL is malformed.
    pub fn lookup_endpoint(&self) -> Result<Url, SettingsError> {
        parse_endpoint(
            "lookup_endpoint",
            self.lookup_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_LOOKUP_ENDPOINT),
        )
    }

    /// Return the upstream timeout.
    ///
    /// # Errors
    /// [`SettingsError::Zero`] when configured as zero.
    pub fn upstream_timeout(&self) -> Result<Duration, SettingsError> {
        let secs = positive(
            "upstream_timeout_secs",
            self.upstream_timeout_secs
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        )?;
        Ok(Duration::from_secs(secs))
    }

    /// Return the rate limiter configuration.
    ///
    /// # Errors
    /// [`SettingsError::Zero`] when the budget, window, or capacity is zero.
    pub fn rate_limit(&self) -> Result<RateLimitConfig, SettingsError> {
        let max_requests = positive(
            "rate_limit_max_requests",
            self.rate_limit_max_requests
                .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS),
        )?;
        let window_secs = positive(
            "rate_limit_window_secs",
            self.rate_limit_window_secs
                .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        )?;
        let max_tracked_clients = positive(
            "rate_limit_max_clients",
            self.rate_limit_max_clients
                .unwrap_or(DEFAULT_RATE_LIMIT_MAX_CLIENTS),
        )?;
        Ok(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
            max_tracked_clients,
        })
    }

    /// Return the bulk pacing configuration. Zero disables pacing.
    #[must_use]
    pub fn bulk_check(&self) -> BulkCheckConfig {
        BulkCheckConfig {
            pacing: Duration::from_millis(self.bulk_pacing_ms.unwrap_or(DEFAULT_BULK_PACING_MS)),
        }
    }

    /// Whether rate limiting trusts forwarding headers. Defaults to `false`.
    #[must_use]
    pub fn trust_forwarded_headers(&self) -> bool {
        self.trust_forwarded_headers.unwrap_or(false)
    }

    /// Return the database URL, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    let url = Url::parse(value).map_err(|err| SettingsError::Endpoint {
        field,
        value: value.to_owned(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SettingsError::Endpoint {
            field,
            value: value.to_owned(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn positive<T: Default + PartialEq>(field: &'static str, value: T) -> Result<T, SettingsError> {
    if value == T::default() {
        Err(SettingsError::Zero { field })
    } else {
        Ok(value)
    }
}

//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use namecheck::domain::{BulkCheckConfig, RateLimitConfig};
use namecheck::inbound::http::client::ClientAddressSource;
use namecheck::outbound::persistence::DbPool;
use namecheck::settings::{NamecheckSettings, SettingsError};
use url::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where and how the availability sources reach the upstream platform.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub(crate) validation_endpoint: Url,
    pub(crate) lookup_endpoint: Url,
    pub(crate) timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upstream: UpstreamConfig,
    pub(crate) rate_limit: RateLimitConfig,
    pub(crate) bulk: BulkCheckConfig,
    pub(crate) client_address: ClientAddressSource,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Resolve every setting the server needs, rejecting invalid values.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] encountered.
    pub fn from_settings(settings: &NamecheckSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            upstream: UpstreamConfig {
                validation_endpoint: settings.validation_endpoint()?,
                lookup_endpoint: settings.lookup_endpoint()?,
                timeout: settings.upstream_timeout()?,
            },
            rate_limit: settings.rate_limit()?,
            bulk: settings.bulk_check(),
            client_address: if settings.trust_forwarded_headers() {
                ClientAddressSource::ForwardedHeaders
            } else {
                ClientAddressSource::Peer
            },
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        })
    }

    /// Attach a database pool; check history then persists to PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

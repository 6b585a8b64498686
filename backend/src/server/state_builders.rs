//! Builders turning a [`ServerConfig`] into HTTP state ports.
//!
//! The history store is Diesel-backed when a pool is configured and
//! process-local otherwise. With the `metrics` feature and a registry, the
//! resolver reports tier usage to Prometheus.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use namecheck::domain::ports::{
    AvailabilityMetrics, CheckHistoryRepository, NoOpAvailabilityMetrics,
};
use namecheck::domain::{AvailabilityResolver, TieredAvailabilityResolver, TokioSleeper};
use namecheck::inbound::http::state::{HttpState, HttpStatePorts};
use namecheck::outbound::availability::{
    HttpUsernameLookupSource, HttpUsernameValidationSource,
};
use namecheck::outbound::history::InMemoryCheckHistory;
#[cfg(feature = "metrics")]
use namecheck::outbound::metrics::PrometheusAvailabilityMetrics;
use namecheck::outbound::persistence::DieselCheckHistoryRepository;

use super::ServerConfig;

#[cfg(feature = "metrics")]
fn build_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn AvailabilityMetrics>> {
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusAvailabilityMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("availability metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpAvailabilityMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn AvailabilityMetrics>> {
    Ok(Arc::new(NoOpAvailabilityMetrics))
}

fn build_resolver(config: &ServerConfig) -> std::io::Result<Arc<dyn AvailabilityResolver>> {
    let upstream = &config.upstream;
    let primary = HttpUsernameValidationSource::new(
        upstream.validation_endpoint.clone(),
        upstream.timeout,
    )
    .map_err(|e| std::io::Error::other(format!("validation client build failed: {e}")))?;
    let fallback =
        HttpUsernameLookupSource::new(upstream.lookup_endpoint.clone(), upstream.timeout)
            .map_err(|e| std::io::Error::other(format!("lookup client build failed: {e}")))?;

    Ok(Arc::new(TieredAvailabilityResolver::new(
        Arc::new(primary),
        Arc::new(fallback),
        build_metrics(config)?,
    )))
}

fn build_history(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<dyn CheckHistoryRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!("check history persisted to PostgreSQL");
            Arc::new(DieselCheckHistoryRepository::new(pool.clone(), clock))
        }
        None => {
            info!("check history kept in memory");
            Arc::new(InMemoryCheckHistory::new(clock))
        }
    }
}

/// Assemble the shared handler state.
///
/// # Errors
/// Returns [`std::io::Error`] when an HTTP client or metric cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = HttpState::new(HttpStatePorts {
        resolver: build_resolver(config)?,
        history: build_history(config, clock.clone()),
        clock,
        sleeper: Arc::new(TokioSleeper),
        rate_limit: config.rate_limit,
        bulk: config.bulk,
        client_address: config.client_address,
    });
    Ok(web::Data::new(state))
}

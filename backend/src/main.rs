//! Service entry point: loads settings, prepares storage, and runs the HTTP
//! server.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use namecheck::inbound::http::health::HealthState;
use namecheck::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use namecheck::settings::NamecheckSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = NamecheckSettings::load()
        .map_err(|e| std::io::Error::other(format!("load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings).map_err(std::io::Error::other)?;
    info!(
        bind_addr = %config.bind_addr(),
        pacing_ms = settings.bulk_check().pacing.as_millis(),
        persistent_history = settings.database_url().is_some(),
        trust_forwarded_headers = settings.trust_forwarded_headers(),
        "starting namecheck"
    );

    let config = match settings.database_url() {
        Some(url) => config.with_db_pool(connect_database(url).await?),
        None => config,
    };

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn connect_database(url: &str) -> std::io::Result<DbPool> {
    run_pending_migrations(url)
        .await
        .map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(url))
        .await
        .map_err(std::io::Error::other)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<Option<PrometheusMetrics>> {
    PrometheusMetricsBuilder::new("namecheck")
        .endpoint("/metrics")
        .build()
        .map(Some)
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}

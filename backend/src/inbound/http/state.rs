//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::CheckHistoryRepository;
use crate::inbound::http::client::ClientAddressSource;
use crate::domain::{
    AvailabilityResolver, BulkCheckConfig, BulkCheckService, CheckHistoryService, PacingSleeper,
    RateLimitConfig, RateLimiter, UsernameCheckService,
};

/// Parameter object bundling the ports and tuning the HTTP state is built from.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub resolver: Arc<dyn AvailabilityResolver>,
    pub history: Arc<dyn CheckHistoryRepository>,
    pub clock: Arc<dyn Clock>,
    pub sleeper: Arc<dyn PacingSleeper>,
    pub rate_limit: RateLimitConfig,
    pub bulk: BulkCheckConfig,
    pub client_address: ClientAddressSource,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub rate_limiter: Arc<RateLimiter>,
    pub checks: UsernameCheckService,
    pub bulk: BulkCheckService,
    pub history: CheckHistoryService,
    pub clock: Arc<dyn Clock>,
    pub client_address: ClientAddressSource,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use namecheck::domain::{BulkCheckConfig, RateLimitConfig, TokioSleeper};
    /// use namecheck::inbound::http::client::ClientAddressSource;
    /// use namecheck::inbound::http::state::{HttpState, HttpStatePorts};
    /// use namecheck::outbound::history::InMemoryCheckHistory;
    /// # use namecheck::domain::AvailabilityResolver;
    /// # fn resolver() -> Arc<dyn AvailabilityResolver> { unimplemented!() }
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::new(HttpStatePorts {
    ///     resolver: resolver(),
    ///     history: Arc::new(InMemoryCheckHistory::new(clock.clone())),
    ///     clock,
    ///     sleeper: Arc::new(TokioSleeper),
    ///     rate_limit: RateLimitConfig::default(),
    ///     bulk: BulkCheckConfig::default(),
    ///     client_address: ClientAddressSource::Peer,
    /// });
    /// let _limiter = state.rate_limiter.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            resolver,
            history,
            clock,
            sleeper,
            rate_limit,
            bulk,
            client_address,
        } = ports;
        Self {
            rate_limiter: Arc::new(RateLimiter::new(rate_limit, clock.clone())),
            checks: UsernameCheckService::new(resolver.clone(), history.clone()),
            bulk: BulkCheckService::with_sleeper(
                resolver,
                history.clone(),
                clock.clone(),
                sleeper,
                bulk,
            ),
            history: CheckHistoryService::new(history),
            clock,
            client_address,
        }
    }
}

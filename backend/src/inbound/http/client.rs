//! Client identification and admission control.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use tracing::warn;

use crate::domain::{Error, RateLimitDecision, RateLimiter};
use crate::inbound::http::state::HttpState;

/// Key used when no client address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Which address identifies a client for rate limiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientAddressSource {
    /// The TCP peer address. Request headers are ignored.
    #[default]
    Peer,
    /// `Forwarded`/`X-Forwarded-For`, falling back to the peer address.
    ///
    /// Only sound behind a proxy that overwrites these headers; clients can
    /// otherwise pick a fresh key per request.
    ForwardedHeaders,
}

/// Rate-limit key for the calling client.
///
/// Derived from the peer address unless the app state trusts forwarding
/// headers; see [`ClientAddressSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(String);

impl ClientKey {
    /// Wrap an explicit key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_request_head(req: &HttpRequest, source: ClientAddressSource) -> Self {
        let info = req.connection_info();
        let addr = match source {
            ClientAddressSource::Peer => info.peer_addr(),
            ClientAddressSource::ForwardedHeaders => info.realip_remote_addr(),
        };
        let key = addr
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .unwrap_or(UNKNOWN_CLIENT);
        Self(key.to_owned())
    }
}

impl FromRequest for ClientKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let source = req
            .app_data::<web::Data<HttpState>>()
            .map_or_else(ClientAddressSource::default, |state| state.client_address);
        ready(Ok(Self::from_request_head(req, source)))
    }
}

/// Admit one inbound request or reject it with `rate_limited`.
///
/// # Errors
/// `rate_limited` when the client's budget is spent; `internal_error` when
/// the limiter state is unavailable.
pub fn admit(limiter: &RateLimiter, client: &ClientKey) -> Result<(), Error> {
    match limiter.check(client.as_str())? {
        RateLimitDecision::Allowed { .. } => Ok(()),
        RateLimitDecision::Limited { retry_after } => {
            warn!(
                client = client.as_str(),
                retry_after_secs = retry_after.as_secs(),
                "rate limit exceeded"
            );
            Err(Error::rate_limited(retry_after))
        }
    }
}

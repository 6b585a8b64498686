//! Wiring for handler tests: in-memory state and multipart bodies.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::test::TestRequest;
use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{BulkCheckConfig, RateLimitConfig};
use crate::inbound::http::client::ClientAddressSource;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::history::InMemoryCheckHistory;

use super::{MutableClock, RecordingSleeper, ScriptedResolver};

const BOUNDARY: &str = "namecheck-test-boundary";

/// Fixed start time shared by handler tests.
pub fn fixed_start() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single() {
        Some(start) => start,
        None => panic!("fixed start is a valid timestamp"),
    }
}

/// HTTP state backed by scripted and in-memory adapters.
pub struct TestHarness {
    /// Clock shared by the limiter, resolver, and history store.
    pub clock: Arc<MutableClock>,
    /// Resolver double recording every call.
    pub resolver: Arc<ScriptedResolver>,
    /// History store behind the state.
    pub history: Arc<InMemoryCheckHistory>,
    /// Records bulk pacing pauses instead of sleeping.
    pub sleeper: Arc<RecordingSleeper>,
    /// State to register on the app under test.
    pub state: web::Data<HttpState>,
}

impl TestHarness {
    /// Harness with default limits and every name available.
    pub fn new() -> Self {
        Self::with_config(RateLimitConfig::default(), |resolver| resolver)
    }

    /// Harness whose resolver is adjusted by `script`.
    pub fn with_resolver(script: impl FnOnce(ScriptedResolver) -> ScriptedResolver) -> Self {
        Self::with_config(RateLimitConfig::default(), script)
    }

    /// Harness with explicit limits and resolver script.
    pub fn with_config(
        rate_limit: RateLimitConfig,
        script: impl FnOnce(ScriptedResolver) -> ScriptedResolver,
    ) -> Self {
        Self::build(rate_limit, ClientAddressSource::Peer, script)
    }

    /// Harness that keys clients by forwarding headers, as behind a proxy.
    pub fn behind_proxy(rate_limit: RateLimitConfig) -> Self {
        Self::build(rate_limit, ClientAddressSource::ForwardedHeaders, |resolver| resolver)
    }

    fn build(
        rate_limit: RateLimitConfig,
        client_address: ClientAddressSource,
        script: impl FnOnce(ScriptedResolver) -> ScriptedResolver,
    ) -> Self {
        let clock = Arc::new(MutableClock::new(fixed_start()));
        let resolver = Arc::new(script(ScriptedResolver::new(clock.clone())));
        let history = Arc::new(InMemoryCheckHistory::new(clock.clone()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            resolver: resolver.clone(),
            history: history.clone(),
            clock: clock.clone(),
            sleeper: sleeper.clone(),
            rate_limit,
            bulk: BulkCheckConfig::default(),
            client_address,
        }));
        Self {
            clock,
            resolver,
            history,
            sleeper,
            state,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// One part of a multipart form body.
pub struct MultipartPart<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

impl<'a> MultipartPart<'a> {
    /// A `file` part with a filename and content type.
    pub fn file(filename: &'a str, content_type: &'a str, body: &'a [u8]) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            content_type: Some(content_type),
            body,
        }
    }

    /// A plain text form field.
    pub fn field(name: &'a str, body: &'a [u8]) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            body,
        }
    }
}

/// Build a `multipart/form-data` POST to `uri` from `parts`.
pub fn multipart_request(uri: &str, parts: &[MultipartPart<'_>]) -> TestRequest {
    let mut payload = Vec::new();
    for part in parts {
        payload.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                part.name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        payload.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            payload.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        payload.extend_from_slice(b"\r\n");
        payload.extend_from_slice(part.body);
        payload.extend_from_slice(b"\r\n");
    }
    payload.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(payload)
}

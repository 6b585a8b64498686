//! Reqwest-backed availability sources.
//!
//! Each adapter performs a single request per call with the client's timeout
//! applied, maps transport and status failures into
//! [`AvailabilitySourceError`], and decodes the JSON body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::dto::{LookupRequestDto, LookupResponseDto, ValidationResponseDto};
use crate::domain::Username;
use crate::domain::ports::{
    AvailabilitySourceError, LookupResponse, UsernameLookupSource, UsernameValidationSource,
    ValidationResponse,
};

/// Fixed birthdate sent to satisfy the validation endpoint's schema.
pub const PLACEHOLDER_BIRTHDAY: &str = "2000-01-01";

const JSON_MEDIA_TYPE: &str = "application/json";

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Primary source asking the validation endpoint to classify a name.
pub struct HttpUsernameValidationSource {
    client: Client,
    endpoint: Url,
}

impl HttpUsernameValidationSource {
    /// Build an adapter with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
        })
    }
}

#[async_trait]
impl UsernameValidationSource for HttpUsernameValidationSource {
    async fn validate(
        &self,
        username: &Username,
    ) -> Result<ValidationResponse, AvailabilitySourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("username", username.as_str()),
                ("birthday", PLACEHOLDER_BIRTHDAY),
            ])
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        ensure_json(&headers)?;

        decode::<ValidationResponseDto>(body.as_ref())?.into_response()
    }
}

/// Fallback source asking the lookup endpoint whether a name is claimed.
pub struct HttpUsernameLookupSource {
    client: Client,
    endpoint: Url,
}

impl HttpUsernameLookupSource {
    /// Build an adapter with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
        })
    }
}

#[async_trait]
impl UsernameLookupSource for HttpUsernameLookupSource {
    async fn lookup(&self, username: &Username) -> Result<LookupResponse, AvailabilitySourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .json(&LookupRequestDto {
                usernames: [username.as_str()],
                exclude_banned_users: true,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        decode::<LookupResponseDto>(body.as_ref())?.into_response()
    }
}

fn ensure_json(headers: &HeaderMap) -> Result<(), AvailabilitySourceError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence == JSON_MEDIA_TYPE {
        Ok(())
    } else if content_type.is_empty() {
        Err(AvailabilitySourceError::unexpected_content_type(
            "no content type",
        ))
    } else {
        Err(AvailabilitySourceError::unexpected_content_type(
            content_type,
        ))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, AvailabilitySourceError> {
    serde_json::from_slice(body).map_err(|error| {
        AvailabilitySourceError::decode(format!("invalid JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> AvailabilitySourceError {
    if error.is_timeout() {
        AvailabilitySourceError::timeout(error.to_string())
    } else {
        AvailabilitySourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AvailabilitySourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AvailabilitySourceError::timeout(message)
        }
        _ => AvailabilitySourceError::status(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    fn headers_with(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        }
        headers
    }

    #[rstest]
    #[case(Some("application/json"))]
    #[case(Some("application/json; charset=utf-8"))]
    #[case(Some("Application/JSON"))]
    fn json_content_types_are_accepted(#[case] content_type: Option<&'static str>) {
        assert!(ensure_json(&headers_with(content_type)).is_ok());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("text/html"))]
    fn other_content_types_are_rejected(#[case] content_type: Option<&'static str>) {
        let err = ensure_json(&headers_with(content_type)).expect_err("rejected");
        assert!(matches!(
            err,
            AvailabilitySourceError::UnexpectedContentType { .. }
        ));
    }

    #[rstest]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::server_error(StatusCode::SERVICE_UNAVAILABLE, false)]
    #[case::throttled(StatusCode::TOO_MANY_REQUESTS, false)]
    fn statuses_map_to_timeout_or_status(#[case] status: StatusCode, #[case] timeout: bool) {
        let err = map_status_error(status, b"{\"errors\":[]}");
        assert_eq!(
            matches!(err, AvailabilitySourceError::Timeout { .. }),
            timeout
        );
        assert!(err.to_string().contains(&status.as_u16().to_string()));
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn undecodable_bodies_map_to_decode_errors() {
        let err = decode::<ValidationResponseDto>(b"<html>").expect_err("not JSON");
        assert!(matches!(err, AvailabilitySourceError::Decode { .. }));
    }
}

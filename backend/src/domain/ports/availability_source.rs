//! Driven ports for the two upstream availability endpoints.
//!
//! The primary validation endpoint classifies a name with a numeric code; the
//! lookup endpoint only reports whether an account already holds the name.
//! Both share one error enum so the resolver can treat tier failures alike.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Username;

/// Decoded answer from the primary validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    /// Numeric discriminant classifying the name.
    pub code: i64,
    /// Optional human-readable explanation.
    pub message: Option<String>,
}

/// Decoded answer from the fallback lookup endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupResponse {
    /// Accounts matching the name.
    pub matches: usize,
}

define_port_error! {
    /// Failures raised while calling an availability endpoint.
    pub enum AvailabilitySourceError {
        /// The request could not be sent or the body could not be read.
        Transport { message: String } =>
            "availability transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "availability request timed out: {message}",
        /// The endpoint answered with a non-success status.
        Status { message: String } =>
            "availability endpoint returned {message}",
        /// The endpoint answered with something other than JSON.
        UnexpectedContentType { message: String } =>
            "availability response is not JSON: {message}",
        /// The JSON body lacked the classification code.
        MissingDiscriminant { message: String } =>
            "availability response missing code: {message}",
        /// The JSON body could not be decoded.
        Decode { message: String } =>
            "availability response decode failed: {message}",
        /// The adapter failed in an unforeseen way.
        Unexpected { message: String } =>
            "availability source failed unexpectedly: {message}",
    }
}

/// Port for the primary, fine-grained validation endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsernameValidationSource: Send + Sync {
    /// Ask the endpoint to classify `username`.
    ///
    /// ```rust,ignore
    /// let response = source.validate(&Username::parse("good_name")?).await?;
    /// assert_eq!(response.code, 0);
    /// ```
    async fn validate(
        &self,
        username: &Username,
    ) -> Result<ValidationResponse, AvailabilitySourceError>;
}

/// Port for the coarse existence lookup used as fallback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsernameLookupSource: Send + Sync {
    /// Count accounts currently holding `username`.
    async fn lookup(&self, username: &Username) -> Result<LookupResponse, AvailabilitySourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_context() {
        let err = AvailabilitySourceError::status("status 503");
        assert_eq!(err.to_string(), "availability endpoint returned status 503");
    }
}

//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their domain counterparts for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The client exhausted its request budget.
    #[schema(rename = "rate_limited")]
    RateLimited,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "invalid username format")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as validation violations or
    /// `retryAfterSeconds`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::AvailabilityStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AvailabilityStatus)]
pub enum AvailabilityStatusSchema {
    #[schema(rename = "available")]
    Available,
    #[schema(rename = "taken")]
    Taken,
    #[schema(rename = "censored")]
    Censored,
    #[schema(rename = "too_short")]
    TooShort,
    #[schema(rename = "too_long")]
    TooLong,
    #[schema(rename = "invalid_characters")]
    InvalidCharacters,
    #[schema(rename = "unknown")]
    Unknown,
    /// Neither upstream endpoint could classify the name.
    #[schema(rename = "error")]
    Error,
}

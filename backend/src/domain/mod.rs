//! Domain primitives, services, and ports.
//!
//! Purpose: Hold the username rules, availability classification, rate
//! limiting, bulk orchestration, and check history semantics independently
//! of HTTP and storage concerns. Adapters live in `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - Username (alias to `username::Username`): syntactically valid name.
//! - AvailabilityVerdict: classification of one checked name.
//! - UsernameCheckService / BulkCheckService / CheckHistoryService: the
//!   services driven by the HTTP layer.

pub mod availability;
pub mod availability_resolver;
pub mod bulk_check;
pub mod check_history;
pub mod error;
pub mod ingestion;
pub mod ports;
pub mod rate_limit;
pub mod trace_id;
pub mod username;
pub mod username_check;

pub use self::availability::{AvailabilityStatus, AvailabilityVerdict, UNVERIFIED_MESSAGE};
#[cfg(test)]
pub use self::availability_resolver::MockAvailabilityResolver;
pub use self::availability_resolver::{
    AvailabilityResolver, TierOutcome, TieredAvailabilityResolver,
};
pub use self::bulk_check::{
    BulkCheckConfig, BulkCheckItem, BulkCheckReport, BulkCheckService, BulkItemOutcome,
    BulkSummary, DEFAULT_BULK_PACING, INVALID_FORMAT_ERROR, PacingSleeper, TokioSleeper,
};
pub use self::check_history::{
    CheckCounts, CheckHistoryService, CheckRecord, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT,
    NewCheckRecord,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ingestion::{
    FILE_LINE_LIMIT, candidate_lines, file_candidate_lines, normalize_candidates,
};
pub use self::rate_limit::{RateLimitConfig, RateLimitDecision, RateLimiter};
pub use self::trace_id::TraceId;
pub use self::username::{
    InvalidUsername, USERNAME_MAX_LEN, USERNAME_MIN_LEN, Username, UsernameViolation,
    ValidationOutcome, validate_username,
};
pub use self::username_check::{RecordedVerdict, UsernameCheckService, invalid_username_error};

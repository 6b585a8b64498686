//! Username availability HTTP handlers.
//!
//! ```text
//! POST   /api/username/check
//! POST   /api/username/bulk-check
//! POST   /api/username/bulk-check-file
//! GET    /api/username/recent
//! DELETE /api/username/recent
//! GET    /api/username/stats
//! ```

use actix_multipart::Multipart;
use actix_web::{delete, get, post, web};
use serde_json::json;
use tracing::info;

use crate::domain::{DEFAULT_RECENT_LIMIT, Error, file_candidate_lines, normalize_candidates};
use crate::inbound::http::ApiResult;
use crate::inbound::http::client::{ClientKey, admit};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::upload::{FILE_FIELD, read_text_upload};
use crate::inbound::http::usernames_dto::{
    BulkCheckFileResponse, BulkCheckRequest, BulkCheckResponse, CheckRecordResponse,
    CheckUsernameRequest, CheckUsernameResponse, ClearHistoryResponse, RecentQuery,
    StatsResponse,
};

fn empty_batch_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} must contain at least one username")).with_details(
        json!({
            "field": field,
            "code": "empty_batch",
        }),
    )
}

fn parse_recent_limit(query: &RecentQuery) -> Result<usize, Error> {
    match query.limit {
        None => Ok(DEFAULT_RECENT_LIMIT),
        Some(0) => Err(Error::invalid_request("limit must be at least 1").with_details(json!({
            "field": "limit",
            "value": 0,
            "code": "out_of_range",
        }))),
        Some(limit) => Ok(usize::try_from(limit).unwrap_or(usize::MAX)),
    }
}

/// Check one username.
#[utoipa::path(
    post,
    path = "/api/username/check",
    request_body = CheckUsernameRequest,
    responses(
        (status = 200, description = "Availability verdict", body = CheckUsernameResponse),
        (status = 400, description = "Invalid username", body = ErrorSchema),
        (
            status = 429,
            description = "Rate limited",
            headers(("Retry-After" = u64, description = "Seconds until the window resets")),
            body = ErrorSchema
        ),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["usernames"],
    operation_id = "checkUsername"
)]
#[post("/username/check")]
pub async fn check_username(
    state: web::Data<HttpState>,
    client: ClientKey,
    payload: web::Json<CheckUsernameRequest>,
) -> ApiResult<web::Json<CheckUsernameResponse>> {
    admit(&state.rate_limiter, &client)?;
    let recorded = state.checks.check(&payload.username).await?;
    Ok(web::Json(recorded.into()))
}

/// Check a list of usernames sequentially.
#[utoipa::path(
    post,
    path = "/api/username/bulk-check",
    request_body = BulkCheckRequest,
    responses(
        (status = 200, description = "Per-username results and summary", body = BulkCheckResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["usernames"],
    operation_id = "bulkCheckUsernames"
)]
#[post("/username/bulk-check")]
pub async fn bulk_check(
    state: web::Data<HttpState>,
    client: ClientKey,
    payload: web::Json<BulkCheckRequest>,
) -> ApiResult<web::Json<BulkCheckResponse>> {
    admit(&state.rate_limiter, &client)?;
    let BulkCheckRequest { usernames } = payload.into_inner();
    let lines = normalize_candidates(&usernames);
    if lines.is_empty() {
        return Err(empty_batch_error("usernames"));
    }
    let report = state.bulk.process_batch(&lines).await;
    Ok(web::Json(report.into()))
}

/// Check the usernames listed in an uploaded text file.
#[utoipa::path(
    post,
    path = "/api/username/bulk-check-file",
    request_body(
        content_type = "multipart/form-data",
        description = "Form with a `file` field holding one username per line \
                       (.txt, at most 5 MiB, first 10000 lines)"
    ),
    responses(
        (
            status = 200,
            description = "Per-username results and summary",
            body = BulkCheckFileResponse
        ),
        (status = 400, description = "Missing, oversized, or non-text file", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["usernames"],
    operation_id = "bulkCheckUsernameFile"
)]
#[post("/username/bulk-check-file")]
pub async fn bulk_check_file(
    state: web::Data<HttpState>,
    client: ClientKey,
    payload: Multipart,
) -> ApiResult<web::Json<BulkCheckFileResponse>> {
    admit(&state.rate_limiter, &client)?;
    let upload = read_text_upload(payload).await?;
    let lines = file_candidate_lines(&upload.contents);
    if lines.is_empty() {
        return Err(empty_batch_error(FILE_FIELD));
    }
    info!(filename = %upload.filename, lines = lines.len(), "bulk file accepted");
    let report = state.bulk.process_batch(&lines).await;
    Ok(web::Json(BulkCheckFileResponse::new(upload.filename, report)))
}

/// Most recent checks, newest first.
#[utoipa::path(
    get,
    path = "/api/username/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Recent checks", body = Vec<CheckRecordResponse>),
        (status = 400, description = "Invalid limit", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "listRecentChecks"
)]
#[get("/username/recent")]
pub async fn recent_checks(
    state: web::Data<HttpState>,
    query: web::Query<RecentQuery>,
) -> ApiResult<web::Json<Vec<CheckRecordResponse>>> {
    let limit = parse_recent_limit(&query)?;
    let records = state.history.recent(limit).await?;
    Ok(web::Json(records.into_iter().map(Into::into).collect()))
}

/// Delete every recorded check.
#[utoipa::path(
    delete,
    path = "/api/username/recent",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "clearCheckHistory"
)]
#[delete("/username/recent")]
pub async fn clear_history(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ClearHistoryResponse>> {
    let deleted = state.history.clear().await?;
    info!(deleted, "check history cleared");
    Ok(web::Json(ClearHistoryResponse {
        message: "History cleared".to_owned(),
        deleted,
    }))
}

/// Aggregate statistics over all recorded checks.
#[utoipa::path(
    get,
    path = "/api/username/stats",
    responses(
        (status = 200, description = "Aggregate counts", body = StatsResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "getCheckStats"
)]
#[get("/username/stats")]
pub async fn check_stats(state: web::Data<HttpState>) -> ApiResult<web::Json<StatsResponse>> {
    let counts = state.history.counts().await?;
    Ok(web::Json(counts.into()))
}

#[cfg(test)]
#[path = "usernames_tests.rs"]
mod tests;

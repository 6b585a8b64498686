//! Request and response payloads for the username endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    BulkCheckItem, BulkCheckReport, BulkItemOutcome, BulkSummary, CheckCounts, CheckRecord,
    RecordedVerdict,
};
use crate::inbound::http::schemas::AvailabilityStatusSchema;

/// Placeholder reported for the unmeasured average response time.
pub const AVG_RESPONSE_TIME_PLACEHOLDER: &str = "N/A";

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body of `POST /api/username/check`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckUsernameRequest {
    #[schema(example = "good_name")]
    pub username: String,
}

/// Body of `POST /api/username/bulk-check`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckRequest {
    #[schema(example = json!(["ab", "good_name", "bad__name"]))]
    pub usernames: Vec<String>,
}

/// Query of `GET /api/username/recent`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Records to return; defaults to 10 and is capped at 100.
    #[param(minimum = 1, example = 10)]
    pub limit: Option<u32>,
}

/// Verdict for a single check.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckUsernameResponse {
    pub username: String,
    pub is_available: bool,
    #[schema(value_type = AvailabilityStatusSchema, example = "available")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Time the check was recorded (RFC 3339).
    pub timestamp: String,
}

impl From<RecordedVerdict> for CheckUsernameResponse {
    fn from(value: RecordedVerdict) -> Self {
        let RecordedVerdict {
            verdict,
            checked_at,
        } = value;
        Self {
            username: verdict.username().to_owned(),
            is_available: verdict.is_available(),
            status: verdict.status().as_str().to_owned(),
            message: verdict.message().map(str::to_owned),
            timestamp: format_timestamp(checked_at),
        }
    }
}

/// One entry of a bulk response.
///
/// `isAvailable` is `null` for invalid or failed entries, which carry
/// `error` instead of `status`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckItemResponse {
    /// Username as submitted, after trimming.
    pub username: String,
    /// Availability, or `null` when the entry was not checked.
    pub is_available: Option<bool>,
    /// Verdict status for checked entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<AvailabilityStatusSchema>)]
    pub status: Option<String>,
    /// Upstream detail for checked entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Why the entry was not checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 time the entry was recorded or rejected.
    pub timestamp: String,
}

impl From<BulkCheckItem> for BulkCheckItemResponse {
    fn from(item: BulkCheckItem) -> Self {
        let is_available = item.is_available();
        let error = item.error().map(str::to_owned);
        let (status, message) = match &item.outcome {
            BulkItemOutcome::Checked(verdict) => (
                Some(verdict.status().as_str().to_owned()),
                verdict.message().map(str::to_owned),
            ),
            BulkItemOutcome::InvalidFormat { .. } | BulkItemOutcome::Failed { .. } => (None, None),
        };
        Self {
            username: item.username,
            is_available,
            status,
            message,
            error,
            timestamp: format_timestamp(item.timestamp),
        }
    }
}

/// Batch counters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSummaryResponse {
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
    pub available: usize,
    pub taken: usize,
}

impl From<BulkSummary> for BulkSummaryResponse {
    fn from(value: BulkSummary) -> Self {
        Self {
            total: value.total,
            processed: value.processed,
            errors: value.errors,
            available: value.available,
            taken: value.taken,
        }
    }
}

/// Response of `POST /api/username/bulk-check`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckResponse {
    pub results: Vec<BulkCheckItemResponse>,
    pub summary: BulkSummaryResponse,
}

impl From<BulkCheckReport> for BulkCheckResponse {
    fn from(report: BulkCheckReport) -> Self {
        Self {
            results: report.results.into_iter().map(Into::into).collect(),
            summary: report.summary.into(),
        }
    }
}

/// Response of `POST /api/username/bulk-check-file`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckFileResponse {
    #[schema(example = "names.txt")]
    pub filename: String,
    pub results: Vec<BulkCheckItemResponse>,
    pub summary: BulkSummaryResponse,
}

impl BulkCheckFileResponse {
    pub fn new(filename: String, report: BulkCheckReport) -> Self {
        let BulkCheckResponse { results, summary } = report.into();
        Self {
            filename,
            results,
            summary,
        }
    }
}

/// A persisted check.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecordResponse {
    pub id: i64,
    pub username: String,
    pub is_available: bool,
    pub checked_at: String,
}

impl From<CheckRecord> for CheckRecordResponse {
    fn from(record: CheckRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            is_available: record.is_available,
            checked_at: format_timestamp(record.checked_at),
        }
    }
}

/// Aggregates over the whole history.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_checks: u64,
    pub available_count: u64,
    pub taken_count: u64,
    #[schema(example = "N/A")]
    pub avg_response_time: String,
}

impl From<CheckCounts> for StatsResponse {
    fn from(counts: CheckCounts) -> Self {
        Self {
            total_checks: counts.total,
            available_count: counts.available,
            taken_count: counts.taken(),
            avg_response_time: AVG_RESPONSE_TIME_PLACEHOLDER.to_owned(),
        }
    }
}

/// Confirmation of `DELETE /api/username/recent`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    #[schema(example = "History cleared")]
    pub message: String,
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvailabilityStatus, AvailabilityVerdict, UsernameViolation};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 10, 15, 30)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn invalid_item_serialises_null_availability() {
        let item = BulkCheckItem {
            username: "ab".to_owned(),
            outcome: BulkItemOutcome::InvalidFormat {
                violations: vec![UsernameViolation::TooShort],
            },
            timestamp: at(),
        };
        let value = serde_json::to_value(BulkCheckItemResponse::from(item)).expect("json");
        assert_eq!(
            value,
            json!({
                "username": "ab",
                "isAvailable": null,
                "error": "invalid username format",
                "timestamp": "2026-04-02T10:15:30.000Z",
            })
        );
    }

    #[rstest]
    fn checked_item_carries_status_and_message() {
        let verdict =
            AvailabilityVerdict::new("rude_name", AvailabilityStatus::Censored).with_message("bad");
        let item = BulkCheckItem {
            username: "rude_name".to_owned(),
            outcome: BulkItemOutcome::Checked(verdict),
            timestamp: at(),
        };
        let value = serde_json::to_value(BulkCheckItemResponse::from(item)).expect("json");
        assert_eq!(value["isAvailable"], Value::Bool(false));
        assert_eq!(value["status"], "censored");
        assert_eq!(value["message"], "bad");
        assert!(value.get("error").is_none());
    }

    #[rstest]
    fn stats_report_placeholder_average() {
        let value = serde_json::to_value(StatsResponse::from(CheckCounts {
            total: 5,
            available: 2,
        }))
        .expect("json");
        assert_eq!(
            value,
            json!({
                "totalChecks": 5,
                "availableCount": 2,
                "takenCount": 3,
                "avgResponseTime": "N/A",
            })
        );
    }
}

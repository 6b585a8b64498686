//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer plus the
//! schema wrappers for domain types ([`ErrorSchema`], [`ErrorCodeSchema`],
//! [`AvailabilityStatusSchema`]) so the domain stays free of utoipa.
//!
//! The document is served by Swagger UI in debug builds and printed by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::health::StatusResponse;
use crate::inbound::http::schemas::{AvailabilityStatusSchema, ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::usernames_dto::{
    BulkCheckFileResponse, BulkCheckItemResponse, BulkCheckRequest, BulkCheckResponse,
    BulkSummaryResponse, CheckRecordResponse, CheckUsernameRequest, CheckUsernameResponse,
    ClearHistoryResponse, StatsResponse,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Namecheck API",
        description = "Single and bulk username availability checks with check history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::usernames::check_username,
        crate::inbound::http::usernames::bulk_check,
        crate::inbound::http::usernames::bulk_check_file,
        crate::inbound::http::usernames::recent_checks,
        crate::inbound::http::usernames::clear_history,
        crate::inbound::http::usernames::check_stats,
        crate::inbound::http::health::api_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AvailabilityStatusSchema,
        CheckUsernameRequest,
        CheckUsernameResponse,
        BulkCheckRequest,
        BulkCheckItemResponse,
        BulkSummaryResponse,
        BulkCheckResponse,
        BulkCheckFileResponse,
        CheckRecordResponse,
        StatsResponse,
        ClearHistoryResponse,
        StatusResponse,
    )),
    tags(
        (name = "usernames", description = "Username availability checks"),
        (name = "history", description = "Check history and statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema fields.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/username/check")]
    #[case("/api/username/bulk-check")]
    #[case("/api/username/bulk-check-file")]
    #[case("/api/username/recent")]
    #[case("/api/username/stats")]
    #[case("/api/status")]
    #[case("/health/ready")]
    fn documents_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn recent_path_documents_read_and_clear() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/username/recent").expect("recent path");
        assert!(item.get.is_some());
        assert!(item.delete.is_some());
    }
}

//! Handler-level tests for the username endpoints.

use super::*;
use crate::domain::{AvailabilityStatus, ErrorCode, MAX_RECENT_LIMIT};
use crate::inbound::http::api_scope;
use crate::inbound::http::upload::MAX_UPLOAD_BYTES;
use crate::test_support::{MultipartPart, TestHarness, multipart_request};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case(None, Ok(DEFAULT_RECENT_LIMIT))]
#[case(Some(1), Ok(1))]
#[case(Some(500), Ok(500))]
#[case(Some(0), Err(ErrorCode::InvalidRequest))]
fn recent_limit_defaults_and_bounds(
    #[case] limit: Option<u32>,
    #[case] expected: Result<usize, ErrorCode>,
) {
    let parsed = parse_recent_limit(&RecentQuery { limit }).map_err(|err| err.code());
    assert_eq!(parsed, expected);
}

#[rstest]
#[actix_web::test]
async fn single_check_returns_verdict() {
    let harness =
        TestHarness::with_resolver(|r| r.with_status("taken_name", AvailabilityStatus::Taken));
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/username/check")
        .set_json(serde_json::json!({ "username": " taken_name " }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["username"], "taken_name");
    assert_eq!(body["isAvailable"], false);
    assert_eq!(body["status"], "taken");
    assert_eq!(body["timestamp"], "2026-05-01T09:00:00.000Z");
    assert!(body.get("message").is_none());
}

#[rstest]
#[actix_web::test]
async fn single_check_rejects_invalid_syntax() {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/username/check")
        .set_json(serde_json::json!({ "username": "bad name!" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "username");
    assert_eq!(body["details"]["violations"][0]["code"], "invalid_characters");
    assert!(harness.resolver.calls().is_empty());
}

#[rstest]
#[case::not_json("username=good_name", "text/plain")]
#[case::missing_field("{}", "application/json")]
#[case::wrong_type("{\"username\": 42}", "application/json")]
#[actix_web::test]
async fn malformed_bodies_are_invalid_requests(#[case] body: &str, #[case] content_type: &str) {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/username/check")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body.to_owned())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case::empty(serde_json::json!({ "usernames": [] }))]
#[case::blank(serde_json::json!({ "usernames": ["", "   ", "\n"] }))]
#[actix_web::test]
async fn empty_bulk_lists_are_rejected(#[case] payload: Value) {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/username/bulk-check")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "usernames");
}

#[rstest]
#[actix_web::test]
async fn file_upload_runs_bulk_check() {
    let harness =
        TestHarness::with_resolver(|r| r.with_status("taken_name", AvailabilityStatus::Taken));
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = multipart_request(
        "/api/username/bulk-check-file",
        &[
            MultipartPart::field("note", b"ignored"),
            MultipartPart::file(
                "names.txt",
                "text/plain",
                b"free_name\r\n\r\n  taken_name \nx\n",
            ),
        ],
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["filename"], "names.txt");
    assert_eq!(body["summary"]["total"], 3);
    assert_eq!(body["summary"]["errors"], 1);
    assert_eq!(body["summary"]["available"], 1);
    assert_eq!(body["summary"]["taken"], 1);
    assert_eq!(body["results"][0]["username"], "x");
    assert_eq!(body["results"][0]["isAvailable"], Value::Null);
    assert_eq!(body["results"][2]["status"], "taken");
}

#[rstest]
#[actix_web::test]
async fn txt_extension_is_accepted_without_text_mime() {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = multipart_request(
        "/api/username/bulk-check-file",
        &[MultipartPart::file(
            "NAMES.TXT",
            "application/octet-stream",
            b"good_name",
        )],
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case::wrong_type(
    MultipartPart::file("names.csv", "text/csv", b"good_name"),
    "unsupported_file_type"
)]
#[case::not_utf8(
    MultipartPart::file("names.txt", "text/plain", &[0xff, 0xfe, 0x00]),
    "invalid_encoding"
)]
#[case::missing_file(MultipartPart::field("other", b"good_name"), "missing_field")]
#[case::empty_file(MultipartPart::file("names.txt", "text/plain", b"\n \n"), "empty_batch")]
#[actix_web::test]
async fn bad_uploads_are_rejected(#[case] part: MultipartPart<'static>, #[case] code: &str) {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let req = multipart_request("/api/username/bulk-check-file", &[part]).to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "file");
    assert_eq!(body["details"]["code"], code);
    assert!(harness.resolver.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn oversized_upload_is_rejected() {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;
    let contents = vec![b'a'; MAX_UPLOAD_BYTES + 1];

    let req = multipart_request(
        "/api/username/bulk-check-file",
        &[MultipartPart::file("big.txt", "text/plain", &contents)],
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "file_too_large");
}

#[rstest]
#[actix_web::test]
async fn recent_checks_are_newest_first_and_capped() {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;
    for name in ["alpha_one", "bravo_two", "charlie_three"] {
        let req = actix_test::TestRequest::post()
            .uri("/api/username/check")
            .set_json(serde_json::json!({ "username": name }))
            .to_request();
        assert!(actix_test::call_service(&app, req).await.status().is_success());
        harness.clock.advance_seconds(1);
    }

    let req = actix_test::TestRequest::get()
        .uri("/api/username/recent?limit=2")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    let names: Vec<_> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|record| record["username"].as_str().expect("username"))
        .collect();
    assert_eq!(names, ["charlie_three", "bravo_two"]);
    assert_eq!(body[0]["isAvailable"], true);
    assert_eq!(body[0]["checkedAt"], "2026-05-01T09:00:02.000Z");

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/username/recent?limit={}", MAX_RECENT_LIMIT * 10))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[rstest]
#[case("/api/username/recent?limit=0")]
#[case("/api/username/recent?limit=lots")]
#[actix_web::test]
async fn invalid_recent_limits_are_rejected(#[case] uri: &str) {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn unknown_api_paths_are_not_found() {
    let harness = TestHarness::new();
    let app =
        actix_test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/username/nope").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

//! End-to-end behaviour of the username API through the public app wiring.

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use namecheck::Trace;
use namecheck::domain::{AvailabilityStatus, RateLimitConfig};
use namecheck::inbound::http::api_scope;
use namecheck::test_support::TestHarness;
use rstest::rstest;
use serde_json::{Value, json};

const PEER: &str = "203.0.113.7:41000";
const OTHER_PEER: &str = "198.51.100.20:41000";

fn check_request_from(peer: &str, name: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/username/check")
        .peer_addr(peer.parse().expect("peer socket addr"))
        .set_json(json!({ "username": name }))
}

fn check_request(name: &str) -> test::TestRequest {
    check_request_from(PEER, name)
}

#[rstest]
#[actix_web::test]
async fn eleventh_request_in_a_window_is_rate_limited() {
    let harness = TestHarness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    for i in 0..10 {
        let res =
            test::call_service(&app, check_request(&format!("name_{i:02}")).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "request {i} should be admitted");
    }

    let res = test::call_service(&app, check_request("one_more").to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        res.headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("60")
    );
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "rate_limited");
    assert_eq!(body["details"]["retryAfterSeconds"], 60);
    assert!(!harness.resolver.called_names().contains(&"one_more".to_owned()));

    harness.clock.advance_seconds(60);
    let res = test::call_service(&app, check_request("one_more").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn clients_have_independent_budgets() {
    let harness = TestHarness::with_config(
        RateLimitConfig {
            max_requests: 1,
            ..RateLimitConfig::default()
        },
        |resolver| resolver,
    );
    let app =
        test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let first = check_request("first_one").to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);

    let other = check_request_from(OTHER_PEER, "second_one").to_request();
    assert_eq!(test::call_service(&app, other).await.status(), StatusCode::OK);

    let again = check_request("third_one").to_request();
    assert_eq!(
        test::call_service(&app, again).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[rstest]
#[actix_web::test]
async fn forwarding_headers_do_not_reset_a_peer_budget() {
    let harness = TestHarness::new();
    let app =
        test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    for i in 0..10 {
        let req = check_request(&format!("name_{i:02}"))
            .insert_header(("X-Forwarded-For", format!("198.51.100.{i}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = check_request("one_more")
        .insert_header(("X-Forwarded-For", "198.51.100.99"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(harness.resolver.called_names().len(), 10);
}

#[rstest]
#[actix_web::test]
async fn trusted_proxy_headers_identify_clients() {
    let harness = TestHarness::behind_proxy(RateLimitConfig {
        max_requests: 1,
        ..RateLimitConfig::default()
    });
    let app =
        test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    for (client, name, expected) in [
        ("198.51.100.1", "first_one", StatusCode::OK),
        ("198.51.100.2", "second_one", StatusCode::OK),
        ("198.51.100.1", "third_one", StatusCode::TOO_MANY_REQUESTS),
    ] {
        let req = check_request(name)
            .insert_header(("X-Forwarded-For", client))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected, "{name}");
    }
}

#[rstest]
#[actix_web::test]
async fn bulk_batch_is_recorded_and_reported() {
    let harness =
        TestHarness::with_resolver(|r| r.with_status("taken_name", AvailabilityStatus::Taken));
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/username/bulk-check")
        .set_json(json!({ "usernames": ["ab", "good_name", "bad__name", "taken_name"] }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));

    let body: Value = test::read_body_json(res).await;
    let names: Vec<&str> = body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|item| item["username"].as_str().expect("username"))
        .collect();
    assert_eq!(names, ["ab", "bad__name", "good_name", "taken_name"]);
    assert_eq!(
        body["summary"],
        json!({ "total": 4, "processed": 2, "errors": 2, "available": 1, "taken": 1 })
    );
    assert_eq!(body["results"][0]["error"], "invalid username format");
    assert_eq!(body["results"][3]["status"], "taken");
    assert_eq!(harness.sleeper.pauses().len(), 1);

    let stats: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/username/stats").to_request(),
    )
    .await;
    assert_eq!(stats["totalChecks"], 2);
    assert_eq!(stats["availableCount"], 1);
    assert_eq!(stats["takenCount"], 1);
    assert_eq!(stats["avgResponseTime"], "N/A");
}

#[rstest]
#[actix_web::test]
async fn clearing_history_resets_stats() {
    let harness = TestHarness::new();
    let app =
        test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    for name in ["alpha_one", "bravo_two"] {
        let res = test::call_service(&app, check_request(name).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let cleared: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::delete()
            .uri("/api/username/recent")
            .to_request(),
    )
    .await;
    assert_eq!(cleared["deleted"], 2);

    let stats: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/username/stats").to_request(),
    )
    .await;
    assert_eq!(stats["totalChecks"], 0);
    assert_eq!(stats["availableCount"], 0);

    let recent: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/username/recent").to_request(),
    )
    .await;
    assert_eq!(recent, json!([]));
}

#[rstest]
#[actix_web::test]
async fn status_reports_server_time() {
    let harness = TestHarness::new();
    let app =
        test::init_service(App::new().app_data(harness.state.clone()).service(api_scope())).await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/status").to_request(),
    )
    .await;
    assert_eq!(body, json!({ "status": "ok", "timestamp": "2026-05-01T09:00:00.000Z" }));
}

//! Integration tests for the authenticated API client
//!
//! Covers request shaping and the replay rules that span more than one
//! request: stale-token replay, replay-once, and error normalization.

mod support;

use std::time::Duration;

use devpage_domain::ErrorCode;
use devpage_infra::api::{ApiError, RequestDescriptor, NO_BODY};
use serde::Deserialize;
use serde_json::json;
use support::{access_token_body, api_path, error_body, TestSession};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Project {
    id: String,
    name: String,
}

/// A request that left with T1 while the stored token became T3 is replayed
/// with T3 and does not trigger a renewal.
#[tokio::test]
async fn test_stale_token_is_replayed_without_renewal() {
    let session = TestSession::signed_in("T1").await;

    Mock::given(method("GET"))
        .and(path(api_path("/projects/p1")))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&session.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/projects/p1")))
        .and(header("authorization", "Bearer T3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "p1", "name": "Portfolio" })),
        )
        .expect(1)
        .mount(&session.server)
        .await;
    session.mount_refresh(ResponseTemplate::new(200), 0).await;

    let client = session.client.clone();
    let pending = tokio::spawn(async move { client.get::<Project>("/projects/p1", true).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    session.client.credentials().set_access_token("T3").await.unwrap();

    let project = pending.await.unwrap().expect("replayed with current token");
    assert_eq!(project.name, "Portfolio");
    assert_eq!(session.client.renewals().renewals_started(), 0);
}

/// The replay is final: a second 401 is returned, not renewed again.
#[tokio::test]
async fn test_replay_happens_at_most_once() {
    let session = TestSession::signed_in("T1").await;

    Mock::given(method("POST"))
        .and(path(api_path("/projects")))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body("TOKEN_INVALID", "Bad")))
        .expect(2)
        .mount(&session.server)
        .await;
    session.mount_refresh(ResponseTemplate::new(200).set_body_json(access_token_body("T2")), 1).await;

    let err = session
        .client
        .post::<_, Project>("/projects", Some(&json!({ "name": "Blog" })), true)
        .await
        .expect_err("second 401 is terminal");

    assert!(err.is_code(&ErrorCode::TokenInvalid));
    assert_eq!(session.hits("/projects").await, 2);
    assert_eq!(session.store.peek().as_deref(), Some("T2"));
}

/// The replay carries the same method and body as the original request.
#[tokio::test]
async fn test_replay_preserves_method_and_body() {
    let session = TestSession::signed_in("T1").await;
    let body = json!({ "name": "Renamed" });

    Mock::given(method("PUT"))
        .and(path(api_path("/projects/p1")))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&session.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/projects/p1")))
        .and(header("authorization", "Bearer T2"))
        .and(body_json(body.clone()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "p1", "name": "Renamed" })),
        )
        .expect(1)
        .mount(&session.server)
        .await;
    session.mount_refresh(ResponseTemplate::new(200).set_body_json(access_token_body("T2")), 1).await;

    let project: Project = session.client.put("/projects/p1", Some(&body), true).await.unwrap();
    assert_eq!(project.name, "Renamed");
}

#[tokio::test]
async fn test_send_with_descriptor() {
    let session = TestSession::signed_in("T1").await;

    Mock::given(method("DELETE"))
        .and(path(api_path("/projects/p1")))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&session.server)
        .await;

    let removed: Option<Project> =
        session.client.send(RequestDescriptor::delete("/projects/p1")).await.unwrap();
    assert_eq!(removed, None);
}

#[tokio::test]
async fn test_validation_error_details_are_surfaced() {
    let session = TestSession::signed_in("T1").await;

    Mock::given(method("POST"))
        .and(path(api_path("/projects")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Validation failed",
                "details": [
                    { "field": "name", "message": "Name is required" },
                    { "field": "slug", "message": "Slug must be lowercase" }
                ],
                "requestId": "req_42"
            }
        })))
        .mount(&session.server)
        .await;

    let err = session
        .client
        .post::<_, Project>("/projects", NO_BODY, true)
        .await
        .expect_err("validation");

    let normalized = err.as_normalized().expect("http error");
    assert_eq!(normalized.kind(), ErrorCode::ValidationError);
    assert_eq!(normalized.status, 422);
    assert_eq!(normalized.request_id, "req_42");
    let fields: Vec<_> =
        normalized.details.as_ref().unwrap().iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "slug"]);
}

#[tokio::test]
async fn test_html_error_page_becomes_unknown_error() {
    let session = TestSession::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/status")))
        .respond_with(ResponseTemplate::new(503).set_body_string("<h1>Maintenance</h1>"))
        .mount(&session.server)
        .await;

    let err = session.client.get::<Project>("/status", false).await.expect_err("503");

    match err {
        ApiError::Api(normalized) => {
            assert!(normalized.is_unknown());
            assert!(normalized.message.contains("503"));
            assert!(normalized.details.is_none());
        }
        other => panic!("expected normalized error, got {:?}", other),
    }
}

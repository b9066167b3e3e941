//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use patient_cache::{api::create_router, AppState, CacheConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::in_memory(CacheConfig::default()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sends one request and returns the status and parsed JSON body.
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Entry Endpoint Tests ==

#[tokio::test]
async fn test_set_and_get_entry() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/entries/123/extracted_data",
        Some(json!({"payload": {"background": "abc"}, "quality": {"confidenceLevel": "high"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "123_extracted_data_v1");

    let (status, json) = send(&app, "GET", "/entries/123/extracted_data", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hit"], true);
    assert_eq!(json["data"], json!({"background": "abc"}));
    assert_eq!(json["entry"]["patientId"], "123");
    assert_eq!(json["entry"]["dataType"], "extracted_data");
    assert_eq!(json["entry"]["accessCount"], 1);
    assert_eq!(json["entry"]["quality"]["confidenceLevel"], "high");
    assert_eq!(json["entry"]["dataHash"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_get_entry_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/entries/nobody/ai_review", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nobody_ai_review_v1"));
}

#[tokio::test]
async fn test_unknown_data_type_is_bad_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/entries/1/summary", Some(json!({"payload": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_entry_reports_not_found() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/9/ai_review", Some(json!({"payload": 1, "ttlMs": 0}))).await;

    let (status, json) = send(&app, "GET", "/entries/9/ai_review", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("expired"));
}

#[tokio::test]
async fn test_versioned_keys_are_separate() {
    let app = create_test_app();

    send(
        &app,
        "PUT",
        "/entries/5/ai_review",
        Some(json!({"payload": {"review": "new"}, "version": "v2"})),
    )
    .await;

    let (status, _) = send(&app, "GET", "/entries/5/ai_review", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(&app, "GET", "/entries/5/ai_review?version=v2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entry"]["key"], "5_ai_review_v2");
}

#[tokio::test]
async fn test_delete_entry() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/1/validation_result", Some(json!({"payload": [1, 2]}))).await;

    let (status, json) = send(&app, "DELETE", "/entries/1/validation_result", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "1_validation_result_v1");

    let (status, _) = send(&app, "GET", "/entries/1/validation_result", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_changed_endpoint() {
    let app = create_test_app();
    let payload = json!({"fields": {"b": 2, "a": 1}});

    let (_, json) = send(&app, "POST", "/entries/3/extracted_data/changed", Some(json!({"payload": payload}))).await;
    assert_eq!(json["changed"], true);

    send(&app, "PUT", "/entries/3/extracted_data", Some(json!({"payload": payload}))).await;

    // Same content with a different key order is unchanged.
    let reordered = json!({"fields": {"a": 1, "b": 2}});
    let (status, json) = send(
        &app,
        "POST",
        "/entries/3/extracted_data/changed",
        Some(json!({"payload": reordered})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changed"], false);

    let (_, json) = send(
        &app,
        "POST",
        "/entries/3/extracted_data/changed",
        Some(json!({"payload": {"fields": {"a": 1, "b": 3}}})),
    )
    .await;
    assert_eq!(json["changed"], true);
}

// == Patient and Warmup Tests ==

#[tokio::test]
async fn test_invalidate_patient() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/1/extracted_data", Some(json!({"payload": "a"}))).await;
    send(&app, "PUT", "/entries/1/ai_review", Some(json!({"payload": "b"}))).await;
    send(&app, "PUT", "/entries/2/ai_review", Some(json!({"payload": "c"}))).await;

    let (status, json) = send(&app, "DELETE", "/patients/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["patientId"], "1");
    assert_eq!(json["removed"], 2);

    let (status, _) = send(&app, "GET", "/entries/1/ai_review", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/entries/2/ai_review", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_warmup_writes_placeholders() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/7/ai_review", Some(json!({"payload": "real"}))).await;

    let (status, json) = send(&app, "POST", "/warmup", Some(json!({"patients": ["7"]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["written"], 2);

    let (_, json) = send(&app, "GET", "/entries/7/extracted_data", None).await;
    assert_eq!(json["data"], Value::Null);
    assert_eq!(json["entry"]["quality"]["placeholder"], true);

    let (_, json) = send(&app, "GET", "/entries/7/ai_review", None).await;
    assert_eq!(json["data"], "real");
}

#[tokio::test]
async fn test_warmup_rejects_empty_patient() {
    let app = create_test_app();

    let (status, _) = send(&app, "POST", "/warmup", Some(json!({"patients": [""]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Rule Endpoint Tests ==

#[tokio::test]
async fn test_rule_listing_and_removal() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/rules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 4);

    let (status, json) = send(&app, "DELETE", "/rules/unused_entries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], true);

    let (status, _) = send(&app, "DELETE", "/rules/unused_entries", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/rules", None).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_apply_rules_removes_expired() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/4/ai_review", Some(json!({"payload": "old", "ttlMs": 1}))).await;
    send(&app, "PUT", "/entries/4/extracted_data", Some(json!({"payload": "fresh"}))).await;

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let (status, json) = send(&app, "POST", "/rules/apply", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);
    assert_eq!(json["refreshed"], 0);

    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["entryCount"], 1);

    let (status, _) = send(&app, "GET", "/entries/4/extracted_data", None).await;
    assert_eq!(status, StatusCode::OK);
}

// == Diagnostics Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/1/ai_review", Some(json!({"payload": 1}))).await;
    send(&app, "GET", "/entries/1/ai_review", None).await;
    send(&app, "GET", "/entries/2/ai_review", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entryCount"], 1);
    assert_eq!(json["hitCount"], 1);
    assert_eq!(json["missCount"], 1);
    assert_eq!(json["totalRequests"], 2);
    assert_eq!(json["hitRate"], 0.5);
    assert!(json["totalSizeBytes"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_info_and_export() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/1/ai_review", Some(json!({"payload": {"secret": "x"}}))).await;

    let (status, json) = send(&app, "GET", "/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["topAccessed"].as_array().unwrap().len(), 1);
    assert!(json["patientSizes"]["1"].as_u64().unwrap() > 0);
    assert_eq!(json["rules"].as_array().unwrap().len(), 4);

    let (status, json) = send(&app, "GET", "/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["exportedAt"].is_string());
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].get("payload").is_none());
}

#[tokio::test]
async fn test_config_update_enforces_limits() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/1/ai_review", Some(json!({"payload": 1}))).await;
    send(&app, "PUT", "/entries/2/ai_review", Some(json!({"payload": 2}))).await;
    send(&app, "PUT", "/entries/3/ai_review", Some(json!({"payload": 3}))).await;

    let (status, json) = send(&app, "PATCH", "/config", Some(json!({"maxEntries": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["maxEntries"], 2);
    assert_eq!(json["persistToDisk"], true);

    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["entryCount"], 2);
    assert_eq!(json["evictionCount"], 1);

    let (_, json) = send(&app, "GET", "/config", None).await;
    assert_eq!(json["maxEntries"], 2);
}

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();

    send(&app, "PUT", "/entries/1/ai_review", Some(json!({"payload": 1}))).await;

    let (status, _) = send(&app, "DELETE", "/entries", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["entryCount"], 0);

    // Cleared entries are gone from the durable tier as well.
    let (status, _) = send(&app, "GET", "/entries/1/ai_review", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

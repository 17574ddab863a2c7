//! HTTP API integration tests
//!
//! Runs the real route table against a seeded in-memory store.

mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use adscope::agent::TaskOrchestrator;
use adscope::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use adscope::api::services::{AppStartTime, SseSettings, api_routes, health_routes};
use adscope::storage::StorageInfo;
use common::{TestServices, test_services};

fn sse_settings() -> SseSettings {
    SseSettings {
        keepalive: Duration::from_secs(30),
        close_delay: Duration::from_millis(10),
        channel_capacity: 64,
    }
}

macro_rules! init_app {
    ($services:expr) => {{
        let s: &TestServices = &$services;
        test::init_service(
            App::new()
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(s.ads.clone()))
                .app_data(web::Data::new(s.favorites.clone()))
                .app_data(web::Data::new(s.orchestrator.clone()))
                .app_data(web::Data::new(StorageInfo {
                    storage_type: "memory".to_string(),
                    persistent: false,
                }))
                .app_data(web::Data::new(AppStartTime::now()))
                .app_data(web::Data::new(sse_settings()))
                .service(api_routes())
                .service(health_routes()),
        )
        .await
    }};
}

// ============ ads ============

#[actix_web::test]
async fn test_list_ads_filters_and_paginates() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get()
        .uri("/api/ads?platform=tiktok&pageSize=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"))
    );
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 4);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert!(
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|ad| ad["platform"] == "tiktok")
    );
}

#[actix_web::test]
async fn test_list_ads_tolerates_bad_pagination() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get()
        .uri("/api/ads?page=abc&pageSize=-4&sort=nonsense")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 20);
    assert_eq!(body["items"][0]["id"], "ad-tt-0002");
}

#[actix_web::test]
async fn test_search_is_case_insensitive() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get().uri("/api/ads?search=LUMEN").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);
}

#[actix_web::test]
async fn test_filter_options() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get().uri("/api/ads/filters").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["platforms"],
        json!(["facebook", "instagram", "other", "tiktok", "youtube"])
    );
    assert!(
        body["mediaTypes"]
            .as_array()
            .unwrap()
            .contains(&json!("short-drama"))
    );
}

#[actix_web::test]
async fn test_get_ad_and_missing_ad() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get().uri("/api/ads/ad-fb-0001").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], "ad-fb-0001");
    assert_eq!(body["advertiserName"], "Glow Labs");

    let req = TestRequest::get().uri("/api/ads/ad-nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2000);
}

// ============ favorites ============

#[actix_web::test]
async fn test_favorite_lifecycle() {
    let services = test_services().await;
    let app = init_app!(services);

    let add = json!({"targetType": "ads", "targetId": "ad-fb-0001", "note": "great hook"});
    let req = TestRequest::post()
        .uri("/api/favorites")
        .set_json(&add)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["userId"], "demo-user");
    assert_eq!(created["targetType"], "ads");

    // 重复收藏
    let req = TestRequest::post()
        .uri("/api/favorites")
        .set_json(&add)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);

    let req = TestRequest::get()
        .uri("/api/favorites/check?targetType=ads&targetId=ad-fb-0001")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"isFavorited": true, "count": 1}));

    let req = TestRequest::get().uri("/api/favorites").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["counts"]["ads"], 1);
    assert_eq!(body["counts"]["creator"], 0);
    assert_eq!(body["items"][0]["note"], "great hook");

    let target = json!({"targetType": "ads", "targetId": "ad-fb-0001"});
    let req = TestRequest::delete()
        .uri("/api/favorites")
        .set_json(&target)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removed: Value = test::read_body_json(resp).await;
    assert_eq!(removed["id"], created["id"]);

    let req = TestRequest::delete()
        .uri("/api/favorites")
        .set_json(&target)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);
}

#[actix_web::test]
async fn test_favorites_are_scoped_per_user() {
    let services = test_services().await;
    let app = init_app!(services);

    for user in ["alice", "bob"] {
        let req = TestRequest::post()
            .uri("/api/favorites")
            .set_json(json!({"userId": user, "targetType": "creator", "targetId": "lumen"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = TestRequest::get()
        .uri("/api/favorites?userId=alice&targetType=creator")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["userId"], "alice");

    let req = TestRequest::get()
        .uri("/api/favorites/check?userId=carol&targetType=creator&targetId=lumen")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"isFavorited": false, "count": 2}));
}

#[actix_web::test]
async fn test_favorite_bad_requests() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::post()
        .uri("/api/favorites")
        .set_json(json!({"targetType": "videos", "targetId": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    let req = TestRequest::post()
        .uri("/api/favorites")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    let req = TestRequest::get()
        .uri("/api/favorites/check?targetType=ads")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============ agent ============

#[actix_web::test]
async fn test_submit_and_get_task() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::post()
        .uri("/api/agent/tasks")
        .set_json(json!({"prompt": "top hooks for pet ads"}))
        .to_request();
    let task: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task["status"], "queued");
    assert_eq!(task["kind"], "analysis");
    let id = task["id"].as_str().unwrap().to_string();

    let req = TestRequest::get()
        .uri(&format!("/api/agent/tasks/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], id.as_str());

    let req = TestRequest::get().uri("/api/agent/tasks/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);
}

#[actix_web::test]
async fn test_submit_rejects_empty_prompt() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::post()
        .uri("/api/agent/tasks")
        .set_json(json!({"prompt": "  "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_stream_relays_until_terminal() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::post()
        .uri("/api/agent/tasks")
        .set_json(json!({"prompt": "summarize short drama trends"}))
        .to_request();
    let task: Value = test::call_and_read_body_json(&app, req).await;
    let id = task["id"].as_str().unwrap();

    let req = TestRequest::get()
        .uri(&format!("/api/agent/tasks/{}/stream", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-cache");

    // 终态后流会自行结束
    let body = tokio::time::timeout(Duration::from_secs(10), test::read_body(resp))
        .await
        .expect("stream did not close");
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.starts_with("event: task\n"));
    assert!(text.contains("event: update\n"));
    let last = text
        .split("\n\n")
        .filter(|f| f.starts_with("event: "))
        .last()
        .unwrap();
    assert!(last.contains("\"status\":\"done\""));
    assert!(last.contains("\"progress\":100"));
}

#[actix_web::test]
async fn test_stream_unknown_task_is_404() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get()
        .uri("/api/agent/tasks/nope/stream")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(services.orchestrator.task_count(), 0);
}

// ============ health ============

#[actix_web::test]
async fn test_health_endpoints() {
    let services = test_services().await;
    let app = init_app!(services);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["adsCount"], 16);
    assert_eq!(body["checks"]["storage"]["backend"]["storageType"], "memory");

    let req = TestRequest::get().uri("/health/ready").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(&body[..], b"OK");

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

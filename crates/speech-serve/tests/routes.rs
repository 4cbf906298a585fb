//! Router-level tests driven through `tower::ServiceExt::oneshot`.
//!
//! The daemon is pointed at a closed local port, so every test either
//! exercises a path the in-process store can answer or asserts the
//! daemon-unreachable fault handling.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt; // for `collect`
use tower::ServiceExt; // for `oneshot`

use speech_core::claim::{ClaimInfo, FileRecord};
use speech_core::{DaemonClient, DaemonConfig};
use speech_serve::state::AppState;
use speech_serve::stats::StatsSink;
use speech_serve::store::Store;
use speech_serve::{Config, router};

const FULL_ID: &str = "0123456789abcdefghijABCDEFGHIJ0123456789";
const BROWSER_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0";

/// Builds a test app whose daemon points at a closed port.
fn build_test_app() -> (Router, AppState) {
    let daemon_config = DaemonConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        request_timeout: Duration::from_secs(2),
    };
    let config = Config {
        bind_addr: "127.0.0.1:0".to_string(),
        daemon: daemon_config.clone(),
        base_url: "http://localhost:3000".to_string(),
        site_name: "Speech".to_string(),
        site_description: "test instance".to_string(),
        stats_url: None,
    };
    let state = AppState {
        daemon: DaemonClient::new(&daemon_config).expect("daemon client"),
        store: Arc::new(Store::new()),
        stats: StatsSink::disabled(),
        config: Arc::new(config),
    };
    (router(state.clone()), state)
}

fn seed_claim(state: &AppState, name: &str, claim_id: &str, content_type: &str) {
    state.store.upsert_claim(ClaimInfo {
        name: name.to_string(),
        claim_id: claim_id.to_string(),
        effective_amount: 1.0,
        height: 100,
        value: speech_core::claim::ClaimValue {
            stream: Some(speech_core::claim::StreamValue {
                metadata: speech_core::claim::StreamMetadata {
                    title: Some(format!("{name} title")),
                    content_type: Some(content_type.to_string()),
                    ..Default::default()
                },
                source: None,
            }),
        },
        ..Default::default()
    });
}

async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> axum::response::Response {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn health_check_works() {
    let (app, _state) = build_test_app();
    let response = get(app, "/health", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn home_page_renders() {
    let (app, _state) = build_test_app();
    let response = get(app, "/", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Speech"));
}

#[tokio::test]
async fn robots_txt_allows_crawlers() {
    let (app, _state) = build_test_app();
    let response = get(app, "/robots.txt", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Allow: /"));
}

#[tokio::test]
async fn invalid_identifier_is_client_error() {
    let (app, _state) = build_test_app();
    let response = get(app, "/bad_name", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_name_segment_is_client_error() {
    let (app, _state) = build_test_app();
    let response = get(app, &format!("/{FULL_ID}/bad_name"), &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fileless_serve_redirects_to_fetch_endpoint() {
    let (app, state) = build_test_app();
    seed_claim(&state, "myvideo", FULL_ID, "video/mp4");

    let response = get(app, "/myvideo.mp4", &[]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        &format!("/api/claim-get/myvideo/{FULL_ID}")
    );
}

#[tokio::test]
async fn fileless_serve_by_id_redirects_too() {
    let (app, state) = build_test_app();
    seed_claim(&state, "myvideo", FULL_ID, "video/mp4");

    let response = get(
        app,
        &format!("/{FULL_ID}/myvideo"),
        &[("accept", "image/png"), ("user-agent", BROWSER_UA)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn local_file_is_served_with_content_type() {
    let (app, state) = build_test_app();
    seed_claim(&state, "pic", FULL_ID, "image/png");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pic.png");
    std::fs::write(&path, b"png-bytes").unwrap();
    state.store.insert_file(FileRecord {
        name: "pic".to_string(),
        claim_id: FULL_ID.to_string(),
        file_path: path.to_string_lossy().to_string(),
        file_name: "pic.png".to_string(),
        content_type: "image/png".to_string(),
        fetched_at: Utc::now(),
    });

    let response = get(app, "/pic.png", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let body = body_string(response).await;
    assert_eq!(body, "png-bytes");
}

#[tokio::test]
async fn serve_url_in_browser_gets_lite_page() {
    let (app, state) = build_test_app();
    seed_claim(&state, "pic", FULL_ID, "image/png");

    let response = get(app, "/pic.png", &[("accept", "text/html")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let body = body_string(response).await;
    assert!(body.contains("hosted via"));
}

#[tokio::test]
async fn show_url_renders_detail_page() {
    let (app, state) = build_test_app();
    seed_claim(&state, "myvideo", FULL_ID, "video/mp4");

    let response = get(
        app,
        &format!("/{FULL_ID}/myvideo"),
        &[("accept", "text/html"), ("user-agent", BROWSER_UA)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("myvideo title"));
    assert!(body.contains("Share this asset"));
}

#[tokio::test]
async fn legacy_reversed_url_still_resolves() {
    let (app, state) = build_test_app();
    seed_claim(&state, "myvideo", FULL_ID, "video/mp4");

    // Old URL shape: /name/claim_id
    let response = get(
        app,
        &format!("/myvideo/{FULL_ID}"),
        &[("accept", "text/html"), ("user-agent", BROWSER_UA)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("myvideo title"));
}

#[tokio::test]
async fn channel_page_lists_store_claims() {
    let (app, state) = build_test_app();
    state.store.record_channel("@news", FULL_ID);
    for i in 0..3 {
        let mut claim = ClaimInfo {
            name: format!("item{i}"),
            claim_id: format!("claim{i}abc"),
            height: i,
            ..Default::default()
        };
        claim.channel_name = Some("@news".to_string());
        state.store.upsert_claim(claim);
    }

    let response = get(app, "/@news", &[("accept", "text/html")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("@news"));
    assert!(body.contains("item2"));
}

#[tokio::test]
async fn claim_in_known_channel_resolves_from_store() {
    let (app, state) = build_test_app();
    state.store.record_channel("@news", FULL_ID);
    let mut claim = ClaimInfo {
        name: "scoop".to_string(),
        claim_id: "scoopid123".to_string(),
        ..Default::default()
    };
    claim.channel_name = Some("@news".to_string());
    state.store.upsert_claim(claim);

    let response = get(app, "/@news/scoop.jpg", &[]).await;
    // Resolves via the store, then redirects because no file is local.
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/claim-get/scoop/scoopid123"
    );
}

#[tokio::test]
async fn unreachable_daemon_surfaces_as_503_page() {
    let (app, _state) = build_test_app();
    let response = get(
        app,
        "/unknownclaim",
        &[("accept", "text/html"), ("user-agent", BROWSER_UA)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_string(response).await;
    assert!(body.contains("daemon may not be running"));
}

#[tokio::test]
async fn unreachable_daemon_surfaces_as_503_json_on_api() {
    let (app, _state) = build_test_app();
    let response = get(app, "/api/claim-list/unknownclaim", &[]).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_string(response).await;
    assert!(body.contains("\"success\":false"));
    assert!(body.contains("\"status\":503"));
}

#[tokio::test]
async fn claim_get_rejects_short_ids() {
    let (app, _state) = build_test_app();
    let response = get(app, "/api/claim-get/pic/abc", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("\"success\":false"));
}

#[tokio::test]
async fn claim_get_serves_known_local_file() {
    let (app, state) = build_test_app();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pic.png");
    std::fs::write(&path, b"cached-bytes").unwrap();
    state.store.insert_file(FileRecord {
        name: "pic".to_string(),
        claim_id: FULL_ID.to_string(),
        file_path: path.to_string_lossy().to_string(),
        file_name: "pic.png".to_string(),
        content_type: "image/png".to_string(),
        fetched_at: Utc::now(),
    });

    let response = get(app, &format!("/api/claim-get/pic/{FULL_ID}"), &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, "cached-bytes");
}

#[tokio::test]
async fn publish_requires_file_path() {
    let (app, _state) = build_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/claim-publish")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name": "pic", "file_path": ""}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn channel_new_rejects_invalid_names() {
    let (app, _state) = build_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/channel-new")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name": "bad channel"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

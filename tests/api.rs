//! Router-level endpoint tests.
//!
//! These go through the full middleware stack via `tower::ServiceExt`, with
//! no bound listener.

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use home_pager::{kube, AppState, Config};

fn test_state() -> AppState {
    let config = Config {
        listen_port: "0".into(),
        upstream_timeout: Duration::from_secs(1),
    };
    let client = kube::build_client(config.upstream_timeout).expect("build client");
    AppState::new(&config, client)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn healthz_always_reports_ok() {
    let app = home_pager::router(test_state());

    let response = app.oneshot(get("/healthz")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn ingresses_rejects_non_get_methods() {
    let app = home_pager::router(test_state());

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let request = Request::builder()
            .method(method.clone())
            .uri("/api/ingresses")
            .body(Body::from("ignored"))
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "method {method}"
        );
    }
}

#[tokio::test]
async fn security_headers_are_set_on_every_route() {
    let app = home_pager::router(test_state());

    // A matched route and the static fallback (404, nothing at /app here).
    for path in ["/healthz", "/no-such-asset"] {
        let response = app.clone().oneshot(get(path)).await.expect("response");
        let headers = response.headers();
        assert_eq!(
            headers.get(header::X_CONTENT_TYPE_OPTIONS).map(|v| v.as_bytes()),
            Some(&b"nosniff"[..]),
            "path {path}"
        );
        assert_eq!(
            headers.get(header::X_FRAME_OPTIONS).map(|v| v.as_bytes()),
            Some(&b"DENY"[..])
        );
        assert_eq!(
            headers.get(header::REFERRER_POLICY).map(|v| v.as_bytes()),
            Some(&b"no-referrer"[..])
        );
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
        assert_eq!(
            headers.get("permissions-policy").map(|v| v.as_bytes()),
            Some(&b"camera=(), microphone=(), geolocation=()"[..])
        );
    }
}

#[tokio::test]
async fn static_fallback_returns_not_found_for_unknown_paths() {
    let app = home_pager::router(test_state());

    let response = app.oneshot(get("/definitely/not/here")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_counter_is_exact_under_concurrency() {
    let state = test_state();
    let app = home_pager::router(state.clone());

    const N: u64 = 50;
    let mut handles = Vec::new();
    for _ in 0..N {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = app.oneshot(get("/healthz")).await.expect("response");
            assert_eq!(response.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.expect("request task");
    }

    assert_eq!(state.requests_total.load(Ordering::Relaxed), N);

    // The metrics request itself is counted before the handler renders.
    let response = app.oneshot(get("/metrics")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/plain; version=0.0.4")
    );

    let body = body_text(response).await;
    assert!(body.contains("# TYPE home_pager_uptime_seconds gauge"));
    assert!(body.contains("# TYPE home_pager_http_requests_total counter"));
    assert!(
        body.contains(&format!("home_pager_http_requests_total {}", N + 1)),
        "unexpected exposition:\n{body}"
    );
}

//! Requests rejected before any query runs; no database needed.

mod common;

use axum::http::StatusCode;
use common::{lazy_pool, request, send, test_app, test_state, test_state_with_rate_limit, token_for};
use schoolhub::schoolhub_config::RateLimitConfig;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_root_reports_ok() {
    let app = test_app(test_state(lazy_pool()));

    let (status, body) = send(&app, request("GET", "/", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "name": "School Management API" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = test_app(test_state(lazy_pool()));

    let mut req = request("GET", "/", None, None);
    req.headers_mut()
        .insert("x-request-id", "trace-me-42".parse().unwrap());
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-42");

    let response = app.oneshot(request("GET", "/", None, None)).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = test_app(test_state(lazy_pool()));

    let (status, body) = send(&app, request("GET", "/api/nothing-here", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app(test_state(lazy_pool()));

    for uri in [
        "/api/auth/me",
        "/api/students",
        "/api/teachers",
        "/api/classes",
        "/api/fees",
        "/api/admin/health",
    ] {
        let (status, body) = send(&app, request("GET", uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = test_app(test_state(lazy_pool()));

    let req = axum::http::Request::builder()
        .uri("/api/classes")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", "/api/classes", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let state = test_state(lazy_pool());
    let mut other = state.clone();
    other.jwt_config.secret = "another-secret".to_string();
    let token = token_for(&other, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let (status, _) = send(&app, request("GET", "/api/teachers", Some(&token), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_restrictions() {
    let state = test_state(lazy_pool());
    let student = token_for(&state, Uuid::new_v4(), "student");
    let teacher = token_for(&state, Uuid::new_v4(), "teacher");
    let parent = token_for(&state, Uuid::new_v4(), "parent");
    let app = test_app(state);

    let cases = [
        ("GET", "/api/students".to_string(), &student),
        ("GET", "/api/students".to_string(), &parent),
        ("POST", "/api/teachers".to_string(), &teacher),
        ("GET", "/api/teachers".to_string(), &student),
        ("DELETE", format!("/api/teachers/{}", Uuid::new_v4()), &teacher),
        ("GET", "/api/fees".to_string(), &teacher),
        ("GET", format!("/api/fees/student/{}/summary", Uuid::new_v4()), &student),
        ("GET", "/api/admin/top-teacher".to_string(), &teacher),
    ];

    for (method, uri, token) in cases {
        let body = (method == "POST").then(|| json!({}));
        let (status, body) = send(&app, request(method, &uri, Some(token), body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"], "Forbidden", "{method} {uri}");
    }
}

#[tokio::test]
async fn test_admin_self_registration_is_forbidden() {
    let app = test_app(test_state(lazy_pool()));

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Root",
                "email": "root@example.com",
                "password": "secret123",
                "role": "admin"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validation_errors_are_unprocessable() {
    let state = test_state(lazy_pool());
    let token = token_for(&state, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/classes",
            Some(&token),
            Some(json!({ "name": "", "code": "G1-01", "grade": "Grade 1", "subject": "General", "capacity": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/students",
            Some(&token),
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "secret123",
                "admission_number": "ADM-1",
                "student_code": "abc"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let state = test_state(lazy_pool());
    let token = token_for(&state, Uuid::new_v4(), "admin");
    let app = test_app(state);

    let (status, _) = send(
        &app,
        request("POST", "/api/fees", Some(&token), Some(json!({ "amount": "lots" }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_class_status_filter() {
    let state = test_state(lazy_pool());
    let token = token_for(&state, Uuid::new_v4(), "teacher");
    let app = test_app(state);

    let (status, body) = send(
        &app,
        request("GET", "/api/classes?status=deleted", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status filter: deleted");
}

#[tokio::test]
async fn test_auth_rate_limit() {
    let state = test_state_with_rate_limit(
        lazy_pool(),
        RateLimitConfig {
            auth_per_second: 1,
            auth_burst_size: 1,
        },
    );
    let app = test_app(state);
    let invalid_login = || {
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "not-an-email", "password": "x" })),
        )
    };

    let (first, _) = send(&app, invalid_login()).await;
    let (second, _) = send(&app, invalid_login()).await;

    assert_eq!(first, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
}

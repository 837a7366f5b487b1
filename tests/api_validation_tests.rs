use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use framekart_backend::services::{
    notify::{NotificationService, OtpSettings},
    pincode::PincodeDirectoryService,
    razorpay::RazorpayService,
    tokens::TokenService,
};
use framekart_backend::{build_router, AppState};

const TEST_JWT_SECRET: &str = "test-secret";

// Validation and auth short-circuits run before any query, so a
// disconnected database is enough for these paths.
fn build_test_router() -> Router {
    let state = AppState {
        db: DatabaseConnection::default(),
        razorpay: RazorpayService::new(
            "rzp_test_key".to_string(),
            "rzp_test_secret".to_string(),
            "https://api.razorpay.com/v1".to_string(),
        ),
        pincode: PincodeDirectoryService::new("https://api.postalpincode.in".to_string()),
        notifier: NotificationService::from_env(),
        tokens: TokenService::new(TEST_JWT_SECRET),
        otp: OtpSettings::from_env(),
    };
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_pincode_rejects_malformed_input() {
    for bad in ["", "12345", "1234567", "012345", "abc123"] {
        let app = build_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/store/pincode?pincode={}", bad))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "pincode {:?} should be rejected",
            bad
        );
        let json = body_json(response).await;
        assert!(json.get("error").is_some());
    }
}

#[tokio::test]
async fn test_unknown_shape_is_not_found() {
    let app = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/store/collections/triangle/men")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_gender_is_not_found() {
    let app = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/store/collections/round/robot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_endpoints_require_bearer_token() {
    for uri in [
        "/api/account/orders",
        "/api/account/prescriptions",
        "/api/account/store-credit",
        "/api/account/profile",
    ] {
        let app = build_test_router();
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} should require authentication",
            uri
        );
    }
}

#[tokio::test]
async fn test_account_rejects_garbage_token() {
    let app = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/account/orders")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_invalid_token() {
    let app = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/token/refresh")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"refresh": "bogus"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_in_refresh_slot() {
    let tokens = TokenService::new(TEST_JWT_SECRET);
    let access = tokens.issue_access(42).unwrap();

    let app = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/token/refresh")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"refresh": "{}"}}"#, access)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_exchanges_valid_token_for_access() {
    let tokens = TokenService::new(TEST_JWT_SECRET);
    let (_, refresh) = tokens.issue_pair(42).unwrap();

    let app = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/token/refresh")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"refresh": "{}"}}"#, refresh)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let access = json["access"].as_str().unwrap();
    assert_eq!(tokens.verify_access(access), Some(42));
}

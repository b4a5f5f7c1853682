//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests call `IntoResponse` directly on `AppError` values; no
//! server is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use flowbridge_api::error::AppError;
use flowbridge_api::relay::RelayError;
use flowbridge_api::site_api::SiteApiError;
use flowbridge_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("ops must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "ops must not be empty");
}

#[tokio::test]
async fn no_peer_returns_503() {
    let (status, json) = error_to_response(RelayError::NoPeerAvailable.into()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "NO_PEER");
    assert_eq!(json["error"], "no executor connected");
}

#[tokio::test]
async fn peer_disconnect_returns_502() {
    let (status, json) = error_to_response(RelayError::PeerDisconnected.into()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "PEER_DISCONNECTED");
}

#[tokio::test]
async fn upstream_status_returns_502() {
    let err = SiteApiError::Status {
        status: StatusCode::FORBIDDEN,
        body: "nope".into(),
    };

    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn missing_token_returns_401() {
    let (status, json) = error_to_response(SiteApiError::MissingToken.into()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn missing_setting_returns_503() {
    let err = SiteApiError::NotConfigured("SITE_CLIENT_ID");

    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "NOT_CONFIGURED");
    assert_eq!(json["error"], "SITE_CLIENT_ID is not configured");
}

#[tokio::test]
async fn encode_failure_hides_details() {
    let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = AppError::Relay(RelayError::Encode(cause));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

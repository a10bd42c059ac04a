//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct
//! HTTP status code, error code, and message. They do NOT need an HTTP
//! server -- they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use needledrop_api::error::AppError;
use needledrop_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "GameSession",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "GameSession with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: CoreError::PoolNotFound maps to 404 with POOL_NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pool_not_found_error_returns_404() {
    let err = AppError::Core(CoreError::PoolNotFound { playlist_id: 9 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "POOL_NOT_FOUND");
    assert_eq!(json["error"], "Playlist 9 has no tracks");
}

// ---------------------------------------------------------------------------
// Test: CoreError::InsufficientPool maps to 400 with INSUFFICIENT_POOL code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insufficient_pool_error_returns_400() {
    let err = AppError::Core(CoreError::InsufficientPool {
        needed: 25,
        have: 12,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INSUFFICIENT_POOL");
    assert_eq!(json["error"], "Track pool too small: need 25 tracks, have 12");
}

// ---------------------------------------------------------------------------
// Test: CoreError::OrderingViolation maps to 409 with index context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ordering_violation_returns_409_with_context() {
    let err = AppError::Core(CoreError::OrderingViolation {
        current: 5,
        requested: 3,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "ORDERING_VIOLATION");
    // The body carries both indexes so the host UI can explain the conflict.
    let message = json["error"].as_str().unwrap();
    assert!(message.contains('5') && message.contains('3'));
}

// ---------------------------------------------------------------------------
// Test: CoreError::ConflictingState maps to 409 with CONFLICTING_STATE code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflicting_state_returns_409() {
    let err = AppError::Core(CoreError::ConflictingState(
        "call 7 at index 2 is already completed".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICTING_STATE");
    assert_eq!(json["error"], "call 7 at index 2 is already completed");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("action must be pull, cue, call, or skip".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "action must be pull, cue, call, or skip");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

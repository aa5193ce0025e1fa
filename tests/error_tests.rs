// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use workout_map::error::AppError;
use workout_map::models::workout::ValidationError;

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::Validation("x".to_string()), StatusCode::BAD_REQUEST),
        (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
        (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
        (AppError::Conflict("x".to_string()), StatusCode::CONFLICT),
        (
            AppError::PersistenceDecode("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            AppError::Storage("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            AppError::Internal(anyhow::anyhow!("x")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}

#[test]
fn test_validation_error_conversion() {
    let err: AppError = ValidationError::NotPositive("distance").into();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "distance must be a positive number"));
}

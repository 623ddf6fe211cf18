// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! HTTP error envelope.
//!
//! Every failure surfaces as `{"error": <code>, "message": <text>}` where
//! `error` is a stable machine-readable code and `message` is the
//! user-facing explanation. Authentication failures keep their messages
//! deliberately vague (no account enumeration); validation and workflow
//! errors are specific and actionable.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StoreError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                Self::conflict("email_taken", "Email already registered.")
            }
            StoreError::NotFound(_) => Self::not_found("User not found."),
            StoreError::InvalidTransition(t) => {
                Self::bad_request("invalid_transition", t.to_string())
            }
            other => {
                tracing::error!(error = %other, "credential store failure");
                Self::internal("Internal server error.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TransitionError;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_code() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.code, "not_found");

        let bad = ApiError::bad_request("invalid_role", "Invalid role.");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.code, "invalid_role");

        let conflict = ApiError::conflict("email_taken", "Email already registered.");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
    }

    #[test]
    fn store_errors_map_to_http_kinds() {
        let dup: ApiError = StoreError::DuplicateEmail.into();
        assert_eq!(dup.status, StatusCode::CONFLICT);
        assert_eq!(dup.code, "email_taken");

        let missing: ApiError = StoreError::NotFound(5).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let transition: ApiError =
            StoreError::InvalidTransition(TransitionError::AlreadyAdmin).into();
        assert_eq!(transition.status, StatusCode::BAD_REQUEST);
        assert_eq!(transition.code, "invalid_transition");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("missing_fields", "Email and password are required.")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "missing_fields");
        assert_eq!(body["message"], "Email and password are required.");
    }
}

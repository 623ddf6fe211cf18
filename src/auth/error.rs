// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Token-verification failures are deliberately all mapped to 401 with
/// generic messages; the precise cause is visible in logs only.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token is malformed
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token is not yet valid
    TokenNotYetValid,
    /// Token subject does not resolve to a live account
    UnknownAccount,
    /// Internal error
    InternalError(String),
    /// Authenticated, but the live role does not permit the operation
    InsufficientPermissions,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    message: String,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::UnknownAccount => "unauthorized",
            AuthError::InsufficientPermissions => "forbidden",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::UnknownAccount => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message. Kept generic for all 401 causes.
    fn message(&self) -> String {
        match self {
            AuthError::MissingAuthHeader => "Authorization header is required.".to_string(),
            AuthError::InvalidAuthHeader => {
                "Invalid authorization header format (expected 'Bearer <token>').".to_string()
            }
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::UnknownAccount => "Invalid or expired token.".to_string(),
            AuthError::InsufficientPermissions => "Insufficient permissions.".to_string(),
            AuthError::InternalError(_) => "Internal authentication error.".to_string(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "authorization header missing"),
            AuthError::InvalidAuthHeader => write!(f, "authorization header malformed"),
            AuthError::MalformedToken => write!(f, "token malformed"),
            AuthError::InvalidSignature => write!(f, "token signature invalid"),
            AuthError::TokenExpired => write!(f, "token expired"),
            AuthError::TokenNotYetValid => write!(f, "token not yet valid"),
            AuthError::UnknownAccount => write!(f, "token subject unknown"),
            AuthError::InternalError(msg) => write!(f, "internal auth error: {msg}"),
            AuthError::InsufficientPermissions => write!(f, "insufficient permissions"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Full cause goes to the log; the response body stays generic.
        if matches!(self, AuthError::InternalError(_)) {
            tracing::error!(error = %self, "authentication internal error");
        } else {
            tracing::debug!(error = %self, "request rejected by auth layer");
        }
        let body = Json(AuthErrorBody {
            error: self.error_code(),
            message: self.message(),
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn token_failures_return_401_with_generic_body() {
        for err in [
            AuthError::MissingAuthHeader,
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::UnknownAccount,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"], "unauthorized");
        }
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "forbidden");
    }
}

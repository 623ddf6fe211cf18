// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Axum extractors for authenticated requests.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! Extraction verifies the bearer token, then RE-FETCHES the account from
//! the credential store: the role used for any gating decision is the live
//! one, never the issuance-time snapshot. This closes the stale-privilege
//! window between a role revocation and the token's expiry.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{tokens, AuthError, AuthenticatedUser, Role};
use crate::state::AppState;

/// Extractor for authenticated accounts.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?
            .trim();

        let claims = tokens::verify_access_token(token, &state.config.access_token_secret)?;

        let account_id: u64 = claims.sub.parse().map_err(|_| AuthError::MalformedToken)?;

        // Live re-read: claims are a snapshot, the store is the truth.
        let account = state
            .store
            .find_by_id(account_id)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::UnknownAccount)?;

        if account.role != claims.role {
            tracing::debug!(
                account_id,
                token_role = %claims.role,
                live_role = %account.role,
                "role changed since token issuance; using live role"
            );
        }

        Ok(Auth(AuthenticatedUser {
            account_id,
            email: account.email,
            role: account.role,
            claims,
        }))
    }
}

/// Extractor that requires the live role to be Admin.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        user.require_role(&[Role::Admin])?;
        Ok(AdminOnly(user))
    }
}

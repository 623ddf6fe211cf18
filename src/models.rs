// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Request and response types for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;
use crate::storage::StoredAccount;

/// Request body for POST /auth/register.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Email address (normalized before storage)
    #[serde(default)]
    pub email: String,
    /// Plaintext password (hashed immediately, never stored)
    #[serde(default)]
    pub password: String,
    /// Requested role-tag: `member` or `admin`. Defaults to `member`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    /// Id of the newly created account
    pub user_id: u64,
    /// The resolved role-tag (`member` or `admin`)
    pub role: String,
}

/// Request body for POST /auth/login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: u64,
    pub email: String,
    pub role: Role,
    pub email_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Suggested frontend landing path; present in login responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl From<&StoredAccount> for UserView {
    fn from(account: &StoredAccount) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
            email_confirmed: account.is_confirmed(),
            email_confirmed_at: account.confirmed_at,
            created_at: account.created_at,
            updated_at: account.updated_at,
            redirect: None,
        }
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token for subsequent requests
    pub access_token: String,
    pub user: UserView,
}

/// Response body for GET /auth/me.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UserView,
}

/// Request body for POST /auth/resend-confirmation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResendConfirmationRequest {
    #[serde(default)]
    pub email: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub message: String,
}

/// One pending admin applicant, as listed for staff review.
#[derive(Debug, Serialize, ToSchema)]
pub struct PendingAccount {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredAccount> for PendingAccount {
    fn from(account: &StoredAccount) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> StoredAccount {
        let now = Utc::now();
        StoredAccount {
            id: 3,
            email: "alice@example.org".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Member,
            confirmed_at: None,
            token_version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_view_never_exposes_password_hash() {
        let view = UserView::from(&account());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn user_view_reflects_confirmation_state() {
        let mut acct = account();
        let view = UserView::from(&acct);
        assert!(!view.email_confirmed);
        assert!(view.email_confirmed_at.is_none());

        acct.confirmed_at = Some(Utc::now());
        let view = UserView::from(&acct);
        assert!(view.email_confirmed);
        assert!(view.email_confirmed_at.is_some());
    }

    #[test]
    fn register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
        assert!(req.role.is_none());
    }
}

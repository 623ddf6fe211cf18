// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Access-token claims and the authenticated-user representation.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims carried in an access token.
///
/// The claims are a snapshot of the account taken at issuance time. They are
/// convenient for display and redirects on the client, but security-relevant
/// gating never trusts them: the authorization layer re-reads the live
/// account on every request (see `extractor.rs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: account id, as a string per JWT convention
    pub sub: String,
    /// Email at issuance
    pub email: String,
    /// Role at issuance
    pub role: Role,
    /// Confirmation state at issuance (always true: login gates on it)
    pub confirmed: bool,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

/// The authenticated account behind a request.
///
/// `email` and `role` are the LIVE values re-read from the credential store
/// during extraction, so a role revoked after token issuance takes effect
/// immediately. The issuance-time snapshot stays available in `claims`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Account id (token subject)
    pub account_id: u64,
    /// Live email from the credential store
    pub email: String,
    /// Live role from the credential store
    pub role: Role,
    /// Claims snapshot from the verified token
    pub claims: AccessClaims,
}

impl AuthenticatedUser {
    /// Check whether the live role satisfies any of `roles`.
    ///
    /// Returns the account id on success so route modules can use this as
    /// their single authorization call.
    pub fn require_role(&self, roles: &[Role]) -> Result<u64, super::AuthError> {
        if roles.iter().any(|required| self.role.has_privilege(*required)) {
            Ok(self.account_id)
        } else {
            Err(super::AuthError::InsufficientPermissions)
        }
    }

    /// Check if this user is an admin (live role).
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            account_id: 7,
            email: "carol@example.org".to_string(),
            role,
            claims: AccessClaims {
                sub: "7".to_string(),
                email: "carol@example.org".to_string(),
                role,
                confirmed: true,
                iat: 1700000000,
                exp: 1700003600,
            },
        }
    }

    #[test]
    fn require_role_accepts_matching_role() {
        assert_eq!(user(Role::Member).require_role(&[Role::Member]), Ok(7));
        assert_eq!(user(Role::Admin).require_role(&[Role::Member]), Ok(7));
    }

    #[test]
    fn require_role_rejects_insufficient_role() {
        assert!(matches!(
            user(Role::Member).require_role(&[Role::Admin]),
            Err(AuthError::InsufficientPermissions)
        ));
    }

    #[test]
    fn is_admin_uses_live_role() {
        assert!(user(Role::Admin).is_admin());
        assert!(!user(Role::Member).is_admin());
        assert!(!user(Role::AdminPending).is_admin());
    }
}

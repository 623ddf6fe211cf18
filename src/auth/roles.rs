// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Account roles and the admin-approval state machine.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account roles.
///
/// ## Role Lifecycle
///
/// - `Member` - Ordinary volunteer account
/// - `AdminPending` - Registered with an admin request, awaiting staff approval
/// - `Admin` - Approved administrative account
///
/// An account registering as `member` starts as `Member`; registering as
/// `admin` starts as `AdminPending` and cannot log in until approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary volunteer account
    Member,
    /// Admin applicant awaiting approval
    AdminPending,
    /// Full administrative access
    Admin,
}

/// Rejected edges of the approval state machine.
///
/// Every transition not explicitly allowed fails with one of these kinds so
/// the HTTP layer can report exactly why the edge was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("User is not an admin applicant")]
    NotAnApplicant,
    #[error("User is already an admin")]
    AlreadyAdmin,
    #[error("Cannot deny an existing admin")]
    CannotDenyAdmin,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            // Admin can do anything
            (Role::Admin, _) => true,
            // Members can do member things
            (Role::Member, Role::Member) => true,
            // Pending applicants have no privileges until approved
            _ => false,
        }
    }

    /// Map a registration role-tag (`member` or `admin`) to the initial role.
    ///
    /// Elevated access is never granted at registration time: requesting
    /// `admin` yields `AdminPending`, which a staff admin must approve.
    pub fn from_registration_tag(tag: &str) -> Option<Role> {
        match tag {
            "member" => Some(Role::Member),
            "admin" => Some(Role::AdminPending),
            _ => None,
        }
    }

    /// The registration tag that produces this role.
    ///
    /// Used when re-sending a confirmation email for an existing account.
    pub fn registration_tag(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::AdminPending | Role::Admin => "admin",
        }
    }

    /// Frontend landing path for a freshly logged-in account.
    pub fn redirect_hint(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            _ => "/member",
        }
    }

    /// Approve an admin application: `AdminPending -> Admin`.
    ///
    /// All other starting states are rejected with a distinguishable error.
    pub fn approve(self) -> Result<Role, TransitionError> {
        match self {
            Role::AdminPending => Ok(Role::Admin),
            Role::Member => Err(TransitionError::NotAnApplicant),
            Role::Admin => Err(TransitionError::AlreadyAdmin),
        }
    }

    /// Deny an admin application: `AdminPending -> Member`.
    pub fn deny(self) -> Result<Role, TransitionError> {
        match self {
            Role::AdminPending => Ok(Role::Member),
            Role::Member => Err(TransitionError::NotAnApplicant),
            Role::Admin => Err(TransitionError::CannotDenyAdmin),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::AdminPending => write!(f, "admin_pending"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Member));
        assert!(Role::Admin.has_privilege(Role::AdminPending));
    }

    #[test]
    fn member_only_has_member_privilege() {
        assert!(Role::Member.has_privilege(Role::Member));
        assert!(!Role::Member.has_privilege(Role::Admin));
    }

    #[test]
    fn pending_has_no_privileges() {
        assert!(!Role::AdminPending.has_privilege(Role::Member));
        assert!(!Role::AdminPending.has_privilege(Role::Admin));
        assert!(!Role::AdminPending.has_privilege(Role::AdminPending));
    }

    #[test]
    fn registration_tags_map_to_initial_roles() {
        assert_eq!(Role::from_registration_tag("member"), Some(Role::Member));
        assert_eq!(Role::from_registration_tag("admin"), Some(Role::AdminPending));
        assert_eq!(Role::from_registration_tag("superuser"), None);
        assert_eq!(Role::from_registration_tag(""), None);
    }

    #[test]
    fn approve_only_from_pending() {
        assert_eq!(Role::AdminPending.approve(), Ok(Role::Admin));
        assert_eq!(Role::Member.approve(), Err(TransitionError::NotAnApplicant));
        assert_eq!(Role::Admin.approve(), Err(TransitionError::AlreadyAdmin));
    }

    #[test]
    fn deny_only_from_pending() {
        assert_eq!(Role::AdminPending.deny(), Ok(Role::Member));
        assert_eq!(Role::Member.deny(), Err(TransitionError::NotAnApplicant));
        assert_eq!(Role::Admin.deny(), Err(TransitionError::CannotDenyAdmin));
    }

    #[test]
    fn redirect_hints_follow_role() {
        assert_eq!(Role::Member.redirect_hint(), "/member");
        assert_eq!(Role::Admin.redirect_hint(), "/admin");
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::AdminPending).unwrap(),
            r#""admin_pending""#
        );
        assert_eq!(serde_json::to_string(&Role::Member).unwrap(), r#""member""#);
    }
}

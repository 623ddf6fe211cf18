// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! # Authentication Module
//!
//! Everything needed to prove who a request comes from and what it may do:
//!
//! 1. Registration hashes the password (`password`) and emits a signed
//!    confirmation token (`confirmation`)
//! 2. Clicking the emailed link proves email control; the store's
//!    `token_version` counter invalidates every other outstanding token
//! 3. Login verifies the password and mints an HS256 access token (`tokens`)
//! 4. Protected routes extract `Authorization: Bearer <JWT>` (`extractor`),
//!    re-reading the live account so role changes apply immediately
//!
//! ## Security
//!
//! - Unknown-email and wrong-password logins are indistinguishable
//! - Token-verification failure causes are collapsed in responses, split in logs
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod confirmation;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod tokens;

pub use claims::{AccessClaims, AuthenticatedUser};
pub use confirmation::{ConfirmationCodec, ConfirmationPayload};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use roles::{Role, TransitionError};

use unicode_normalization::UnicodeNormalization;

/// Normalize an email address for storage and comparison.
///
/// NFKC-normalized, trimmed, lower-cased. Uniqueness and lookups all operate
/// on this form, so `Alice@X.org` and `alice@x.org` are the same account.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@X.org "), "alice@x.org");
        assert_eq!(normalize_email("bob@example.org"), "bob@example.org");
    }

    #[test]
    fn normalize_applies_nfkc() {
        // Fullwidth letters fold to ASCII under NFKC
        assert_eq!(normalize_email("ａｂｃ@example.org"), "abc@example.org");
    }
}

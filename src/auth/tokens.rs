// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Access-token issuance and verification (HS256 JWT).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::AccessClaims;
use super::error::AuthError;
use super::roles::Role;

/// Clock skew tolerance (60 seconds).
pub const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Mint an access token for a confirmed, login-eligible account.
///
/// The claims are a snapshot: account edits after issuance do not change an
/// outstanding token. Role gating re-reads the store at request time instead.
pub fn issue_access_token(
    account_id: u64,
    email: &str,
    role: Role,
    secret: &str,
    max_age_secs: u64,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: account_id.to_string(),
        email: email.to_string(),
        role,
        confirmed: true,
        iat: now,
        exp: now + max_age_secs as i64,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::InternalError(format!("failed to sign access token: {e}")))
}

/// Verify an access token's signature and expiry, returning its claims.
pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.validate_aud = false;

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        _ => AuthError::MalformedToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_roundtrip() {
        let token = issue_access_token(42, "alice@example.org", Role::Admin, SECRET, 3600).unwrap();
        let claims = verify_access_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@example.org");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.confirmed);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_access_token(1, "a@example.org", Role::Member, SECRET, 3600).unwrap();
        let err = verify_access_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Issue a token that expired beyond the leeway window
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: "1".to_string(),
            email: "a@example.org".to_string(),
            role: Role::Member,
            confirmed: true,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_access_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let err = verify_access_token("not-a-jwt", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Stateless email-confirmation tokens.
//!
//! A confirmation token is a signed, self-contained proof of email control
//! with no server-side record:
//!
//! ```text
//! base64url(json payload) "." base64url(hmac-sha256(payload))
//! ```
//!
//! Validity is a function of three things only: the HMAC signature, the
//! embedded issuance timestamp against a maximum age, and the embedded
//! `token_version` against the account's live counter. Bumping the counter
//! on a successful confirmation therefore revokes every outstanding token
//! for that account without a token blacklist.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Payload embedded in a confirmation token.
///
/// Field names are kept short because the whole payload rides in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPayload {
    /// Account id
    #[serde(rename = "uid")]
    pub account_id: u64,
    /// Email the token was issued for
    #[serde(rename = "em")]
    pub email: String,
    /// Registration role-tag (`member` or `admin`)
    #[serde(rename = "r")]
    pub role_tag: String,
    /// Account token_version at issuance
    #[serde(rename = "v")]
    pub version: u32,
    /// Issuance unix timestamp
    #[serde(rename = "ts")]
    pub issued_at: i64,
}

/// Encoder/decoder for confirmation tokens, keyed by a server secret.
#[derive(Clone)]
pub struct ConfirmationCodec {
    key: Vec<u8>,
}

impl ConfirmationCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Encode a signed confirmation token issued now.
    pub fn encode(&self, account_id: u64, email: &str, role_tag: &str, version: u32) -> String {
        self.encode_at(account_id, email, role_tag, version, Utc::now().timestamp())
    }

    fn encode_at(
        &self,
        account_id: u64,
        email: &str,
        role_tag: &str,
        version: u32,
        issued_at: i64,
    ) -> String {
        let payload = ConfirmationPayload {
            account_id,
            email: email.to_string(),
            role_tag: role_tag.to_string(),
            version,
            issued_at,
        };
        let json = serde_json::to_vec(&payload).expect("confirmation payload serializes");
        let body = Base64UrlUnpadded::encode_string(&json);
        let tag = self.mac(&body).finalize().into_bytes();
        format!("{body}.{}", Base64UrlUnpadded::encode_string(&tag))
    }

    /// Decode and verify a token.
    ///
    /// Returns `None` on malformed input, signature mismatch, or age beyond
    /// `max_age_secs`. Callers cannot tell the causes apart (no oracle for
    /// attackers probing tokens); the distinction is logged at debug level.
    pub fn decode(&self, token: &str, max_age_secs: u64) -> Option<ConfirmationPayload> {
        let Some((body, sig)) = token.split_once('.') else {
            tracing::debug!("confirmation token rejected: missing signature separator");
            return None;
        };
        let Ok(sig_bytes) = Base64UrlUnpadded::decode_vec(sig) else {
            tracing::debug!("confirmation token rejected: signature not base64url");
            return None;
        };
        // Constant-time comparison via hmac's verify
        if self.mac(body).verify_slice(&sig_bytes).is_err() {
            tracing::debug!("confirmation token rejected: signature mismatch");
            return None;
        }
        let Ok(json) = Base64UrlUnpadded::decode_vec(body) else {
            tracing::debug!("confirmation token rejected: payload not base64url");
            return None;
        };
        let Ok(payload) = serde_json::from_slice::<ConfirmationPayload>(&json) else {
            tracing::debug!("confirmation token rejected: payload not valid JSON");
            return None;
        };
        let age = Utc::now().timestamp() - payload.issued_at;
        if age > max_age_secs as i64 {
            tracing::debug!(age_secs = age, "confirmation token rejected: expired");
            return None;
        }
        Some(payload)
    }

    fn mac(&self, body: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(body.as_bytes());
        mac
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

use std::sync::Arc;

use crate::auth::ConfirmationCodec;
use crate::config::Config;
use crate::mailer::Mailer;
use crate::storage::CredentialStore;

/// Shared application state.
///
/// The credential store is the only shared mutable resource; everything else
/// here is read-only after startup. The mailer rides along as an explicit
/// handle rather than a module-level singleton so handlers (and tests) can
/// swap transports.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CredentialStore>,
    pub config: Arc<Config>,
    pub mailer: Arc<Mailer>,
    pub confirmations: ConfirmationCodec,
}

impl AppState {
    pub fn new(store: CredentialStore, config: Config, mailer: Mailer) -> Self {
        let confirmations = ConfirmationCodec::new(&config.confirm_token_secret);
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            mailer: Arc::new(mailer),
            confirmations,
        }
    }

    /// Absolute confirmation link for a token.
    pub fn confirmation_url(&self, token: &str) -> String {
        let mut url = self.config.public_base_url.clone();
        url.set_path(&format!("/auth/confirm/{token}"));
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn confirmation_url_joins_base_and_token() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open(&dir.path().join("credentials.redb")).unwrap();
        let state = AppState::new(store, Config::default(), Mailer::Log);

        assert_eq!(
            state.confirmation_url("abc.def"),
            "http://localhost:8080/auth/confirm/abc.def"
        );
    }
}

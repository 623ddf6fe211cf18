// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the credential store | `./data` |
//! | `ACCESS_TOKEN_SECRET` | HS256 signing secret for access tokens | `change-me` (warns) |
//! | `CONFIRM_TOKEN_SECRET` | HMAC secret for confirmation tokens | falls back to `ACCESS_TOKEN_SECRET` |
//! | `ACCESS_TOKEN_MAX_AGE_SECS` | Access token lifetime | `3600` |
//! | `CONFIRM_TOKEN_MAX_AGE_SECS` | Confirmation token lifetime | `86400` |
//! | `PUBLIC_BASE_URL` | Externally reachable base URL for confirmation links | `http://localhost:8080` |
//! | `FRONTEND_ORIGIN` | Frontend origin the confirm handler redirects to | `http://localhost:5173` |
//! | `MAIL_API_URL` | Transactional-mail HTTP API endpoint | unset (log mailer) |
//! | `MAIL_API_KEY` | API key for the mail endpoint | unset |
//! | `MAIL_SENDER` | Sender address for outbound mail | `no-reply@volunteerhub.org` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";
pub const CONFIRM_TOKEN_SECRET_ENV: &str = "CONFIRM_TOKEN_SECRET";
pub const ACCESS_TOKEN_MAX_AGE_ENV: &str = "ACCESS_TOKEN_MAX_AGE_SECS";
pub const CONFIRM_TOKEN_MAX_AGE_ENV: &str = "CONFIRM_TOKEN_MAX_AGE_SECS";
pub const PUBLIC_BASE_URL_ENV: &str = "PUBLIC_BASE_URL";
pub const FRONTEND_ORIGIN_ENV: &str = "FRONTEND_ORIGIN";
pub const MAIL_API_URL_ENV: &str = "MAIL_API_URL";
pub const MAIL_API_KEY_ENV: &str = "MAIL_API_KEY";
pub const MAIL_SENDER_ENV: &str = "MAIL_SENDER";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEV_SECRET: &str = "change-me";

/// Outbound-mail collaborator configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Transactional-mail HTTP API endpoint
    pub api_url: Url,
    /// API key sent in the `api-key` header
    pub api_key: String,
    /// Sender address
    pub sender: String,
}

/// Service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub access_token_secret: String,
    pub confirm_token_secret: String,
    pub access_token_max_age_secs: u64,
    pub confirm_token_max_age_secs: u64,
    pub public_base_url: Url,
    pub frontend_origin: String,
    pub mail: Option<MailConfig>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Malformed values for required URLs panic at startup; everything else
    /// falls back to the documented defaults.
    pub fn from_env() -> Self {
        let access_token_secret =
            env::var(ACCESS_TOKEN_SECRET_ENV).unwrap_or_else(|_| DEV_SECRET.to_string());
        if access_token_secret == DEV_SECRET {
            tracing::warn!(
                "{} is not set; using the development default. \
                 Set a strong secret before exposing this service.",
                ACCESS_TOKEN_SECRET_ENV
            );
        }
        let confirm_token_secret =
            env::var(CONFIRM_TOKEN_SECRET_ENV).unwrap_or_else(|_| access_token_secret.clone());

        let public_base_url = env::var(PUBLIC_BASE_URL_ENV)
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let public_base_url = Url::parse(&public_base_url)
            .unwrap_or_else(|e| panic!("{PUBLIC_BASE_URL_ENV} is not a valid URL: {e}"));

        let mail = match (env::var(MAIL_API_URL_ENV), env::var(MAIL_API_KEY_ENV)) {
            (Ok(api_url), Ok(api_key)) => {
                let api_url = Url::parse(&api_url)
                    .unwrap_or_else(|e| panic!("{MAIL_API_URL_ENV} is not a valid URL: {e}"));
                Some(MailConfig {
                    api_url,
                    api_key,
                    sender: env::var(MAIL_SENDER_ENV)
                        .unwrap_or_else(|_| "no-reply@volunteerhub.org".to_string()),
                })
            }
            _ => None,
        };

        Self {
            host: env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var(PORT_ENV)
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: env::var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            access_token_secret,
            confirm_token_secret,
            access_token_max_age_secs: env_u64(ACCESS_TOKEN_MAX_AGE_ENV, 60 * 60),
            confirm_token_max_age_secs: env_u64(CONFIRM_TOKEN_MAX_AGE_ENV, 60 * 60 * 24),
            public_base_url,
            frontend_origin: env::var(FRONTEND_ORIGIN_ENV)
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            mail,
        }
    }
}

impl Default for Config {
    /// Development defaults; also the baseline for test fixtures.
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            access_token_secret: DEV_SECRET.to_string(),
            confirm_token_secret: DEV_SECRET.to_string(),
            access_token_max_age_secs: 60 * 60,
            confirm_token_max_age_secs: 60 * 60 * 24,
            public_base_url: Url::parse("http://localhost:8080").expect("static URL parses"),
            frontend_origin: "http://localhost:5173".to_string(),
            mail: None,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("{name} is not a valid integer; using default {default}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_friendly() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.access_token_max_age_secs, 3600);
        assert_eq!(config.confirm_token_max_age_secs, 86400);
        assert!(config.mail.is_none());
        assert_eq!(config.public_base_url.as_str(), "http://localhost:8080/");
    }
}

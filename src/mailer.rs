// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Outbound mail collaborator.
//!
//! The identity core only ever needs "send this message to this address";
//! delivery is delegated to a transactional-mail HTTP API when configured,
//! and to the log otherwise (development mode). Callers treat dispatch as
//! best-effort: a failure is logged by the caller and never fails the
//! request that triggered it.

use serde::Serialize;
use url::Url;

use crate::config::MailConfig;

/// Error raised when mail dispatch fails.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail API returned status {0}")]
    Api(u16),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    text_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<String>,
}

/// Mail transport backed by a transactional-mail HTTP API.
pub struct HttpApiMailer {
    client: reqwest::Client,
    api_url: Url,
    api_key: String,
    sender: String,
}

impl HttpApiMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        }
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> Result<(), MailError> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender.clone(),
            },
            to: vec![EmailAddress {
                email: to.to_string(),
            }],
            subject: subject.to_string(),
            text_content: text.to_string(),
            html_content: html.map(|h| h.to_string()),
        };

        let response = self
            .client
            .post(self.api_url.clone())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Api(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Outbound mail handle, passed into the core via `AppState`.
pub enum Mailer {
    /// Production transport (HTTP API configured)
    Http(HttpApiMailer),
    /// Development fallback: messages go to the log
    Log,
}

impl Mailer {
    /// Build from configuration: HTTP transport when configured, log otherwise.
    pub fn from_config(mail: Option<&MailConfig>) -> Self {
        match mail {
            Some(config) => Mailer::Http(HttpApiMailer::new(config)),
            None => {
                tracing::warn!("no mail API configured; outbound mail will be logged only");
                Mailer::Log
            }
        }
    }

    /// Send a message. Callers log failures and carry on.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> Result<(), MailError> {
        match self {
            Mailer::Http(mailer) => mailer.send(to, subject, text, html).await,
            Mailer::Log => {
                tracing::info!(%to, %subject, body = %text, "mail dispatch (dev mode)");
                Ok(())
            }
        }
    }
}

/// Build the confirmation email: `(subject, text body, html body)`.
pub fn confirmation_email(confirm_url: &str) -> (String, String, String) {
    let subject = "Confirm your account".to_string();
    let text = format!(
        "Please confirm your email by clicking the link: {confirm_url}\n\
         If you did not create an account, you can ignore this email."
    );
    let html = format!(
        "<p>Welcome!</p>\
         <p>Click the button below to confirm your email and activate your account.</p>\
         <p><a href=\"{confirm_url}\" style=\"padding:10px 18px;background:#52796f;color:#fff;\
         text-decoration:none;border-radius:4px;\">Confirm Email</a></p>\
         <p>If the button doesn't work, copy &amp; paste this link into your browser:<br>{confirm_url}</p>"
    );
    (subject, text, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = Mailer::Log;
        let result = mailer
            .send("alice@example.org", "Confirm your account", "body", None)
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn confirmation_email_embeds_link_in_both_bodies() {
        let url = "http://localhost:8080/auth/confirm/tok-123";
        let (subject, text, html) = confirmation_email(url);
        assert_eq!(subject, "Confirm your account");
        assert!(text.contains(url));
        assert!(html.contains(url));
    }

    #[test]
    fn send_body_serializes_camel_case() {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: "no-reply@volunteerhub.org".to_string(),
            },
            to: vec![EmailAddress {
                email: "alice@example.org".to_string(),
            }],
            subject: "s".to_string(),
            text_content: "t".to_string(),
            html_content: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("textContent"));
        assert!(!json.contains("htmlContent"));
    }
}

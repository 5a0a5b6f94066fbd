// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification email composition and delivery.
//!
//! [`compose`] turns a sanitized submission into one transactional message
//! for the operator inbox. [`EmailDispatcher`] hands it to a provider;
//! [`ResendDispatcher`] is the HTTP implementation. Nothing here retries.

use crate::config::EmailConfig;
use crate::models::SanitizedSubmission;
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// A fully formed message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub reply_to: String,
}

/// Delivery failures. Display output never contains message content.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Email provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider rejected message with status {status}")]
    Rejected { status: u16 },

    #[error("Invalid email provider URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Delivers composed emails.
pub trait EmailDispatcher: Send + Sync + 'static {
    fn send(&self, email: OutboundEmail) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// Build the operator notification for a submission.
pub fn compose(submission: &SanitizedSubmission, config: &EmailConfig) -> OutboundEmail {
    let name = submission.name();
    let email = submission.email();
    let company = submission
        .company()
        .map(|c| format!("\n      <p><strong>Company:</strong> {c}</p>"))
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #1a1a2e; border-bottom: 2px solid #d4af37; padding-bottom: 10px;">New Contact Form Submission</h1>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h2 style="color: #333; margin-top: 0;">Contact Details</h2>
      <p><strong>Name:</strong> {name}</p>
      <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>{company}
  </div>
  <div style="background-color: #fff; padding: 20px; border: 1px solid #ddd; border-radius: 8px;">
    <h2 style="color: #333; margin-top: 0;">Project Details</h2>
    <p style="line-height: 1.6;">{message}</p>
  </div>
  <p style="color: #666; font-size: 12px; margin-top: 20px;">This email was sent from the LIT Productions contact form.</p>
</div>"#,
        message = submission.message(),
    );

    OutboundEmail {
        from: config.from.clone(),
        to: vec![config.to.clone()],
        subject: format!("New Contact Form Submission from {name}"),
        html,
        reply_to: email.to_string(),
    }
}

/// Dispatcher for the Resend HTTP API.
pub struct ResendDispatcher {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl ResendDispatcher {
    pub fn new(config: &EmailConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let endpoint = config.api_url.join("emails")?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.expose().to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl EmailDispatcher for ResendDispatcher {
    async fn send(&self, email: OutboundEmail) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "Email provider accepted message");
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form client.
//!
//! The browser side of the pipeline: holds the form, shows per-field errors,
//! throttles submissions per session and posts accepted forms to the relay.
//! It validates with the same rule table as the server, so a form the
//! client accepts is never rejected by the server for field reasons.
//!
//! The session limiter fails open. If session storage cannot be read or
//! written, or holds garbage, the submission is allowed: a local storage
//! fault must not block a legitimate user, and the server limiter remains
//! the enforcement boundary.

use crate::clock::{Clock, SystemClock};
use crate::limiter::{WindowPolicy, WindowRecord};
use crate::models::{ContactForm, ContactSubmission, Field};
use crate::validator::{ContactValidator, FieldErrors};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Session storage key for the submission counter.
pub const SESSION_RATE_LIMIT_KEY: &str = "contact_form_submissions";

/// Session storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage unavailable")]
    Unavailable,

    #[error("session storage quota exceeded")]
    QuotaExceeded,
}

/// Per-session string storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory session storage, dropped with the session.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Unavailable)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Error)]
enum SessionLimitError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("corrupt session record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Submission throttle for one browser session.
pub struct SessionRateLimiter<S, C = SystemClock> {
    store: S,
    policy: WindowPolicy,
    clock: C,
}

impl<S: SessionStore> SessionRateLimiter<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: SessionStore, C: Clock> SessionRateLimiter<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            policy: WindowPolicy::client(),
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Count one submission attempt; `true` means the session is throttled.
    ///
    /// Storage and decode failures count as not limited.
    pub fn is_limited(&self) -> bool {
        match self.try_check() {
            Ok(limited) => limited,
            Err(e) => {
                warn!(error = %e, "Session rate limit unavailable, allowing submission");
                false
            }
        }
    }

    fn try_check(&self) -> Result<bool, SessionLimitError> {
        let record = match self.store.get(SESSION_RATE_LIMIT_KEY)? {
            Some(raw) => Some(serde_json::from_str::<WindowRecord>(&raw)?),
            None => None,
        };

        let (record, result) = self.policy.apply(record, self.clock.now());
        if result.is_limited() {
            return Ok(true);
        }

        self.store
            .set(SESSION_RATE_LIMIT_KEY, serde_json::to_string(&record)?)?;
        Ok(false)
    }
}

/// Where and how the client reaches the relay.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the submission endpoint
    pub endpoint: Url,
    /// Public API key sent as `apikey` and bearer token, if the gateway wants one
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            api_key: None,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A transient notification shown after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: &'static str,
    pub description: &'static str,
    pub variant: ToastVariant,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Throttled locally; nothing was sent
    RateLimited,
    /// Field errors are now set on the form; nothing was sent
    Invalid,
    /// The relay accepted the submission; the form was reset
    Sent,
    /// Network or server failure
    Failed,
}

impl SubmitOutcome {
    /// Notification for this outcome. Field errors are shown inline instead.
    pub fn toast(&self) -> Option<Toast> {
        match self {
            Self::RateLimited => Some(Toast {
                title: "Too many requests",
                description: "Please wait a moment before submitting again.",
                variant: ToastVariant::Destructive,
            }),
            Self::Invalid => None,
            Self::Sent => Some(Toast {
                title: "Message Sent Successfully!",
                description: "Thank you for reaching out. We'll get back to you within 24 hours.",
                variant: ToastVariant::Default,
            }),
            Self::Failed => Some(Toast {
                title: "Error sending message",
                description: "Please try again later or contact us directly.",
                variant: ToastVariant::Destructive,
            }),
        }
    }
}

/// Contact form state plus the transport to the relay.
pub struct ContactFormClient<S = MemorySessionStore, C = SystemClock> {
    http: reqwest::Client,
    config: ClientConfig,
    limiter: SessionRateLimiter<S, C>,
    validator: ContactValidator,
    form: ContactForm,
    errors: FieldErrors,
}

impl ContactFormClient<MemorySessionStore, SystemClock> {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        Self::with_limiter(config, SessionRateLimiter::new(MemorySessionStore::default()))
    }
}

impl<S: SessionStore, C: Clock> ContactFormClient<S, C> {
    pub fn with_limiter(
        config: ClientConfig,
        limiter: SessionRateLimiter<S, C>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            limiter,
            validator: ContactValidator::new(),
            form: ContactForm::default(),
            errors: FieldErrors::default(),
        })
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Update a field as the user types, clearing that field's error.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value.into());
        self.errors.clear(field);
    }

    /// Submit the current form.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.errors = FieldErrors::default();

        if self.limiter.is_limited() {
            return SubmitOutcome::RateLimited;
        }

        let submission = match self.validator.validate(&self.form) {
            Ok(submission) => submission,
            Err(errors) => {
                self.errors = errors;
                return SubmitOutcome::Invalid;
            }
        };

        match self.send(submission).await {
            Ok(()) => {
                self.form = ContactForm::default();
                SubmitOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "Contact submission failed");
                SubmitOutcome::Failed
            }
        }
    }

    async fn send(&self, mut submission: ContactSubmission) -> Result<(), reqwest::Error> {
        submission.email = submission.email.to_lowercase();

        let mut request = self
            .http
            .post(self.config.endpoint.clone())
            .json(&submission);
        if let Some(key) = &self.config.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        debug!(status = response.status().as_u16(), "Contact submission accepted");
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process router helpers and fake email dispatchers.

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use contact_relay::{
    config::{ApiKey, Config},
    email::{DispatchError, EmailDispatcher, OutboundEmail},
    handlers::{router, AppState, SUBMIT_PATH},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Dispatcher that records every email instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_with: Option<u16>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose provider rejects everything with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(status),
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl EmailDispatcher for RecordingDispatcher {
    async fn send(&self, email: OutboundEmail) -> Result<(), DispatchError> {
        if let Some(status) = self.fail_with {
            return Err(DispatchError::Rejected { status });
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Dispatcher that panics, for exercising the outermost error boundary.
#[derive(Debug, Default)]
pub struct PanickingDispatcher;

impl EmailDispatcher for PanickingDispatcher {
    async fn send(&self, _: OutboundEmail) -> Result<(), DispatchError> {
        panic!("provider client exploded");
    }
}

/// Configuration with a dummy API key and default limits.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.email.api_key = ApiKey::new("re_test_key");
    config
}

/// Router plus a handle on its state.
pub fn app<D: EmailDispatcher>(dispatcher: D) -> (Router, Arc<AppState<D>>) {
    app_with_config(test_config(), dispatcher)
}

pub fn app_with_config<D: EmailDispatcher>(
    config: Config,
    dispatcher: D,
) -> (Router, Arc<AppState<D>>) {
    let state = Arc::new(AppState::new(config, dispatcher).unwrap());
    (router(state.clone()), state)
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn error(&self) -> String {
        self.json()["error"].as_str().unwrap().to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send one request through the router.
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    user_agent: Option<&str>,
    body: impl Into<Body>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(ua) = user_agent {
        builder = builder.header(header::USER_AGENT, ua);
    }

    let response = app
        .clone()
        .oneshot(builder.body(body.into()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body,
    }
}

/// POST a JSON payload to the submission endpoint.
pub async fn submit(app: &Router, user_agent: &str, payload: &Value) -> TestResponse {
    send(
        app,
        Method::POST,
        SUBMIT_PATH,
        Some(user_agent),
        payload.to_string(),
    )
    .await
}

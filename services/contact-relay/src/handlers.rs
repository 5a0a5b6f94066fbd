// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay service.
//!
//! A submission request runs, in order: CORS preflight short-circuit,
//! method check, rate limit, body parse, validation, sanitization and
//! email dispatch. Each stage can end the request; none of them stores
//! the submission.

use crate::config::Config;
use crate::email::{compose, EmailDispatcher};
use crate::error::ApiError;
use crate::limiter::{identifier_for, RateLimitResult, RateLimiter};
use crate::metrics::{Metrics, Outcome};
use crate::models::ContactForm;
use crate::sanitizer::sanitize;
use crate::validator::ContactValidator;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Path of the submission endpoint.
pub const SUBMIT_PATH: &str = "/send-contact-email";

/// Largest submission body buffered, well above the field limits.
pub const MAX_BODY_BYTES: usize = 128 * 1024;

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Shared application state.
pub struct AppState<D> {
    pub limiter: RateLimiter,
    pub validator: ContactValidator,
    pub dispatcher: D,
    pub metrics: Metrics,
    pub config: Config,
}

impl<D: EmailDispatcher> AppState<D> {
    pub fn new(config: Config, dispatcher: D) -> Result<Self, prometheus::Error> {
        Ok(Self {
            limiter: RateLimiter::new(&config.rate_limit),
            validator: ContactValidator::new(),
            dispatcher,
            metrics: Metrics::new()?,
            config,
        })
    }
}

/// Successful submission body.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router<D: EmailDispatcher>(state: Arc<AppState<D>>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route(
            SUBMIT_PATH,
            post(submit::<D>).fallback(method_not_allowed),
        );

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics::<D>));
    }

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handle one contact form submission.
///
/// The body is taken unbuffered so that oversized payloads are still
/// counted by the rate limiter and answered with a JSON 400.
pub async fn submit<D: EmailDispatcher>(
    State(state): State<Arc<AppState<D>>>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<SubmitResponse>, ApiError> {
    let result = process(&state, &headers, body).await;

    state.metrics.record(match &result {
        Ok(()) => Outcome::Accepted,
        Err(ApiError::RateLimited { .. }) => Outcome::RateLimited,
        Err(ApiError::MalformedBody) => Outcome::Malformed,
        Err(ApiError::Invalid(_)) => Outcome::Invalid,
        Err(_) => Outcome::DispatchFailed,
    });

    result.map(|()| Json(SubmitResponse { success: true }))
}

async fn process<D: EmailDispatcher>(
    state: &AppState<D>,
    headers: &HeaderMap,
    body: Body,
) -> Result<(), ApiError> {
    // Keyed on the user-agent; the peer address is never consulted.
    let user_agent = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()));
    let identifier = identifier_for(user_agent.as_deref());

    if let RateLimitResult::Limited { retry_after } = state.limiter.check(&identifier).await {
        info!(retry_after_secs = retry_after.as_secs(), "Submission rate limited");
        return Err(ApiError::RateLimited { retry_after });
    }

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        debug!(error = %e, limit = MAX_BODY_BYTES, "Submission body not buffered");
        ApiError::MalformedBody
    })?;

    let form: ContactForm = serde_json::from_slice(&body).map_err(|e| {
        debug!(line = e.line(), column = e.column(), "Malformed submission body");
        ApiError::MalformedBody
    })?;

    let submission = state.validator.validate(&form).map_err(|errors| {
        info!(error = %errors, "Submission failed validation");
        ApiError::Invalid(errors)
    })?;

    info!("Processing contact form submission");
    let email = compose(&sanitize(submission), &state.config.email);
    state.dispatcher.send(email).await?;
    info!("Contact notification sent");

    Ok(())
}

/// Prometheus metrics endpoint.
pub async fn metrics<D: EmailDispatcher>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Answer preflights directly and add CORS headers to every response.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    let pairs: [(HeaderName, &'static str); 3] = [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    ];
    for (name, value) in pairs {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

fn handle_panic(_: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal("request handler panicked".to_string()).into_response()
}

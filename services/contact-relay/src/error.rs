// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP-facing error type for the submission endpoint.
//!
//! Each variant maps to one status and a fixed or field-naming message.
//! Provider and internal details are logged, never returned.

use crate::email::DispatchError;
use crate::validator::FieldErrors;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
pub const RATE_LIMITED_ERROR: &str = "Too many requests. Please try again later.";
pub const METHOD_NOT_ALLOWED_ERROR: &str = "Method not allowed";
pub const MALFORMED_BODY_ERROR: &str = "Invalid request body";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("rate limited")]
    RateLimited { retry_after: Duration },

    #[error("malformed request body")]
    MalformedBody,

    #[error("{0}")]
    Invalid(FieldErrors),

    #[error("email dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::MalformedBody | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Dispatch(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed => METHOD_NOT_ALLOWED_ERROR.to_string(),
            Self::RateLimited { .. } => RATE_LIMITED_ERROR.to_string(),
            Self::MalformedBody => MALFORMED_BODY_ERROR.to_string(),
            Self::Invalid(errors) => errors.summary(),
            Self::Dispatch(_) | Self::Internal(_) => GENERIC_ERROR.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            error!(error = %self, "Contact submission failed");
        }

        let retry_after = match &self {
            Self::RateLimited { retry_after } => Some(retry_after.as_secs().max(1)),
            _ => None,
        };

        let mut response = (
            self.status(),
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! Receives contact form submissions over HTTP and forwards each one to the
//! site operator as a single notification email:
//!
//! - Shared field rules for the form client and the server
//! - Fixed-window rate limiting on both sides of the network boundary
//! - HTML escaping of every user-supplied field
//! - Email delivery through an external provider
//!
//! Submissions are never stored, and no network address is read or logged.

pub mod client;
pub mod clock;
pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod sanitizer;
pub mod validator;

pub use config::Config;
pub use email::{EmailDispatcher, OutboundEmail, ResendDispatcher};
pub use handlers::{router, AppState};
pub use limiter::{RateLimitResult, RateLimiter};
pub use models::{ContactForm, ContactSubmission, Field};
pub use validator::{ContactValidator, FieldErrors};

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay.
//!
//! Loaded once at startup from environment variables (a `.env` file is
//! honoured by the binary). A missing provider API key fails startup.

use crate::limiter::WindowPolicy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Email provider configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server-side rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per window per identifier (default: 5)
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,

    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Maximum identifiers held in memory (default: 10000)
    #[serde(default = "default_max_tracked")]
    pub max_tracked: usize,
}

/// Provider API key. Never serialized, redacted in debug output.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Outbound email configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default, skip_serializing)]
    pub api_key: ApiKey,

    /// Provider base URL (default: https://api.resend.com)
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Sender identity
    #[serde(default = "default_from")]
    pub from: String,

    /// Operator inbox receiving submissions
    #[serde(default = "default_to")]
    pub to: String,

    /// Provider request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_per_window() -> u32 {
    WindowPolicy::server().max_per_window
}

fn default_window_secs() -> u64 {
    WindowPolicy::server().window.as_secs()
}

fn default_max_tracked() -> usize {
    10_000
}

fn default_api_url() -> Url {
    Url::parse("https://api.resend.com").expect("static URL is valid")
}

fn default_from() -> String {
    "LIT Productions Contact <onboarding@resend.dev>".to_string()
}

fn default_to() -> String {
    "litaiproductions@gmail.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            email: EmailConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_max_per_window(),
            window_secs: default_window_secs(),
            max_tracked: default_max_tracked(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            api_url: default_api_url(),
            from: default_from(),
            to: default_to(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn policy(&self) -> WindowPolicy {
        WindowPolicy {
            max_per_window: self.max_per_window,
            window: self.window_duration(),
        }
    }
}

impl EmailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Recognised variables: `BIND_ADDR`, `RESEND_API_KEY` (required),
    /// `RESEND_API_URL`, `CONTACT_FROM`, `CONTACT_TO`, `EMAIL_TIMEOUT_SECS`,
    /// `RATE_LIMIT_MAX`, `RATE_LIMIT_WINDOW_SECS`, `RATE_LIMIT_MAX_TRACKED`,
    /// `METRICS_ENABLED`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        let api_key = get("RESEND_API_KEY").ok_or(ConfigError::Missing("RESEND_API_KEY"))?;
        config.email.api_key = ApiKey::new(api_key);

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(url) = get("RESEND_API_URL") {
            config.email.api_url = parse_var("RESEND_API_URL", &url)?;
        }
        if let Some(from) = get("CONTACT_FROM") {
            config.email.from = from;
        }
        if let Some(to) = get("CONTACT_TO") {
            config.email.to = to;
        }
        if let Some(v) = get("EMAIL_TIMEOUT_SECS") {
            config.email.timeout_secs = parse_var("EMAIL_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("RATE_LIMIT_MAX") {
            config.rate_limit.max_per_window = parse_var("RATE_LIMIT_MAX", &v)?;
            if config.rate_limit.max_per_window == 0 {
                return Err(ConfigError::Invalid {
                    var: "RATE_LIMIT_MAX",
                    value: v,
                });
            }
        }
        if let Some(v) = get("RATE_LIMIT_WINDOW_SECS") {
            config.rate_limit.window_secs = parse_var("RATE_LIMIT_WINDOW_SECS", &v)?;
        }
        if let Some(v) = get("RATE_LIMIT_MAX_TRACKED") {
            config.rate_limit.max_tracked = parse_var("RATE_LIMIT_MAX_TRACKED", &v)?;
        }
        if let Some(v) = get("METRICS_ENABLED") {
            config.metrics.enabled = parse_var("METRICS_ENABLED", &v)?;
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiting for contact submissions.
//!
//! [`WindowPolicy::apply`] is the single algorithm; the server's
//! [`RateLimiter`] and the form client's session limiter both call it:
//! 1. No record, or the window has run its full length: open a new window
//!    with count 1 and allow.
//! 2. Count already at the maximum: limit, leaving the count untouched.
//! 3. Otherwise: increment and allow.
//!
//! Identifiers never contain network addresses; see [`identifier_for`].

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the current window ends
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::Limited { .. })
    }
}

/// Submission count for one identifier's current window.
///
/// Serialized as `{"count": n, "timestamp": <epoch millis>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub count: u32,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub window_start: DateTime<Utc>,
}

/// Window length and admission ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub max_per_window: u32,
    pub window: Duration,
}

impl WindowPolicy {
    /// Server enforcement: 5 submissions per minute.
    pub fn server() -> Self {
        Self {
            max_per_window: 5,
            window: Duration::from_secs(60),
        }
    }

    /// Browser session feedback: 3 submissions per minute.
    pub fn client() -> Self {
        Self {
            max_per_window: 3,
            window: Duration::from_secs(60),
        }
    }

    /// Time elapsed since the record's window opened. Zero if the clock
    /// has moved backwards.
    fn elapsed(&self, record: &WindowRecord, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(record.window_start)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_expired(&self, record: &WindowRecord, now: DateTime<Utc>) -> bool {
        self.elapsed(record, now) >= self.window
    }

    /// Apply one submission to an identifier's record.
    ///
    /// Returns the record to store and the decision. A limited record is
    /// returned unchanged.
    pub fn apply(
        &self,
        record: Option<WindowRecord>,
        now: DateTime<Utc>,
    ) -> (WindowRecord, RateLimitResult) {
        match record {
            Some(mut record) if !self.is_expired(&record, now) => {
                let reset_in = self.window.saturating_sub(self.elapsed(&record, now));
                if record.count >= self.max_per_window {
                    return (record, RateLimitResult::Limited { retry_after: reset_in });
                }
                record.count += 1;
                let remaining = self.max_per_window - record.count;
                (record, RateLimitResult::Allowed { remaining, reset_in })
            }
            _ => (
                WindowRecord {
                    count: 1,
                    window_start: now,
                },
                RateLimitResult::Allowed {
                    remaining: self.max_per_window.saturating_sub(1),
                    reset_in: self.window,
                },
            ),
        }
    }
}

/// Rate limit key for a request, derived from its user-agent header.
///
/// A BLAKE3 digest truncated to 16 hex characters. Requests without a
/// user-agent share the `unknown` bucket.
pub fn identifier_for(user_agent: Option<&str>) -> String {
    let source = user_agent.unwrap_or("unknown");
    blake3::hash(source.as_bytes()).to_hex().as_str()[..16].to_string()
}

/// Thread-safe, bounded server rate limiter.
pub struct RateLimiter<C: Clock = SystemClock> {
    /// Window parameters
    policy: WindowPolicy,
    /// Table capacity
    max_tracked: usize,
    clock: C,
    /// Per-identifier windows
    records: Arc<RwLock<HashMap<String, WindowRecord>>>,
}

impl RateLimiter<SystemClock> {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(config: &RateLimitConfig, clock: C) -> Self {
        Self {
            policy: config.policy(),
            max_tracked: config.max_tracked.max(1),
            clock,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Count one submission from `identifier` and decide whether it may proceed.
    pub async fn check(&self, identifier: &str) -> RateLimitResult {
        let now = self.clock.now();
        let mut records = self.records.write().await;

        let existing = records.get(identifier).copied();
        if existing.is_none() && records.len() >= self.max_tracked {
            self.make_room(&mut records, now);
        }

        let (record, result) = self.policy.apply(existing, now);
        records.insert(identifier.to_string(), record);

        if let RateLimitResult::Limited { retry_after } = result {
            debug!(?retry_after, "Submission rate limit exceeded");
        }
        result
    }

    /// Submissions counted in the identifier's current window, if tracked.
    pub async fn count(&self, identifier: &str) -> Option<u32> {
        let records = self.records.read().await;
        records.get(identifier).map(|r| r.count)
    }

    /// Number of identifiers currently tracked.
    pub async fn tracked(&self) -> usize {
        self.records.read().await.len()
    }

    /// Free one slot: drop expired windows, then the oldest window if needed.
    fn make_room(&self, records: &mut HashMap<String, WindowRecord>, now: DateTime<Utc>) {
        records.retain(|_, record| !self.policy.is_expired(record, now));
        if records.len() < self.max_tracked {
            return;
        }

        let oldest = records
            .iter()
            .min_by_key(|(_, record)| record.window_start)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            warn!(capacity = self.max_tracked, "Rate limit table full, evicting oldest window");
            records.remove(&key);
        }
    }
}

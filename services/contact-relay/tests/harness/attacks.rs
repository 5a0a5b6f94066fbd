// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse patterns for security testing.

use super::app::submit;
use super::generators::{generate_user_agents, numbered_payload};
use super::metrics::{AttackMetrics, Outcome};
use axum::Router;
use serde_json::json;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of distinct user-agents to rotate through
    pub unique_agents: usize,
    /// Whether payloads pass validation
    pub valid_payloads: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_agents: 1,
            valid_payloads: true,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood from one user-agent.
    pub fn single_agent_flood() -> Self {
        Self {
            total_requests: 50,
            unique_agents: 1,
            ..Default::default()
        }
    }

    /// Many user-agents, a few requests each.
    pub fn rotating_agents() -> Self {
        Self {
            total_requests: 200,
            unique_agents: 20,
            ..Default::default()
        }
    }

    /// Junk submissions meant to burn the limit without sending mail.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 40,
            unique_agents: 4,
            valid_payloads: false,
        }
    }
}

/// Replay an attack pattern against the router, rotating user-agents.
pub async fn run_attack(app: &Router, config: &AttackConfig) -> AttackMetrics {
    let agents = generate_user_agents(config.unique_agents.max(1));
    let mut metrics = AttackMetrics::new();
    metrics.start();

    for i in 0..config.total_requests {
        let agent = &agents[i % agents.len()];
        let payload = if config.valid_payloads {
            numbered_payload(i)
        } else {
            json!({ "name": "", "email": "x", "message": "" })
        };
        let response = submit(app, agent, &payload).await;
        metrics.record(Outcome::from_status(response.status), agent);
    }

    metrics.finish();
    metrics
}

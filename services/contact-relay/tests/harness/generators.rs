// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators.

use serde_json::{json, Value};

/// Generate a pool of distinct user-agent strings.
pub fn generate_user_agents(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "Mozilla/5.0 (X11; Linux x86_64; rv:{}.0) Gecko/20100101 Firefox/{}.{}",
                100 + i / 10,
                100 + i / 10,
                i % 10
            )
        })
        .collect()
}

/// A well-formed submission.
pub fn valid_payload() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "company": "",
        "message": "I would like a quote for a new site."
    })
}

/// A well-formed submission with a distinguishing name.
pub fn numbered_payload(i: usize) -> Value {
    json!({
        "name": format!("Sender {i}"),
        "email": format!("sender{i}@example.com"),
        "message": format!("Message number {i}, long enough to pass."),
    })
}

/// Payloads that fail validation in various ways.
pub fn invalid_payloads() -> Vec<Value> {
    vec![
        json!({ "name": "", "email": "bad-email", "message": "short" }),
        json!({ "name": "   ", "email": "jane@example.com", "message": "long enough message" }),
        json!({ "name": "Jane", "email": "jane@example", "message": "long enough message" }),
        json!({ "name": "Jane", "email": "jane@example.com", "message": "          x" }),
        json!({ "name": "x".repeat(101), "email": "jane@example.com", "message": "long enough message" }),
        json!({ "name": "Jane", "email": "jane@example.com", "company": "c".repeat(201), "message": "long enough message" }),
        json!({ "name": "Jane", "email": "jane@example.com", "message": "m".repeat(5001) }),
        json!({}),
    ]
}

/// Bodies that are not a contact form at all.
pub fn malformed_bodies() -> Vec<&'static str> {
    vec![
        "",
        "not json",
        "{\"name\": \"Jane\"",
        "[1, 2, 3]",
        "\"just a string\"",
        "{\"name\": 42, \"email\": \"a@b.co\", \"message\": \"long enough message\"}",
    ]
}

/// Markup injection attempts.
pub fn generate_xss_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "\"><img src=x onerror=alert(document.cookie)>",
        "<a href='javascript:alert(1)'>click</a>",
        "</p><iframe src=\"https://evil.example\"></iframe>",
        "<svg/onload=alert('x')>",
        "&lt;script&gt; pre-escaped & raw <b>",
    ]
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML escaping for user text embedded in notification emails.
//!
//! Line breaks become `<br>` tags; no whitespace-preserving styling is
//! relied on anywhere. Already-escaped input is escaped again.

use crate::models::{ContactSubmission, SanitizedSubmission};

/// Escape text for interpolation into an HTML document.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("<br>");
            }
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }

    out
}

/// Escape every text field; the email is also trimmed and lower-cased.
pub fn sanitize(submission: ContactSubmission) -> SanitizedSubmission {
    SanitizedSubmission {
        name: escape_html(&submission.name),
        email: escape_html(&submission.email.trim().to_lowercase()),
        company: submission.company.as_deref().map(escape_html),
        message: escape_html(&submission.message),
    }
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form data types.
//!
//! A submission moves through three shapes, each produced only by the
//! previous stage: [`ContactForm`] (raw input) is validated into a
//! [`ContactSubmission`], which is sanitized into a [`SanitizedSubmission`].
//! Nothing here is persisted.

use serde::{Deserialize, Serialize};

/// A contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Company,
    Message,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate submission, exactly as typed or received.
///
/// Absent JSON fields become empty strings so they fail validation as
/// missing rather than failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
}

impl ContactForm {
    /// Current raw value of a field (empty for an absent company).
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Company => self.company.as_deref().unwrap_or(""),
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Company => self.company = Some(value),
            Field::Message => self.message = value,
        }
    }
}

/// A submission that passed validation. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
}

/// A validated submission with every field safe to embed in HTML.
///
/// Only [`crate::sanitizer::sanitize`] constructs this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) company: Option<String>,
    pub(crate) message: String,
}

impl SanitizedSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed, lower-cased reply address.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

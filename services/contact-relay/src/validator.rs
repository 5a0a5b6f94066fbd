// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form validation.
//!
//! Field constraints live in a single rule table, [`CONTACT_RULES`], which
//! both the form client and the submission handler validate against:
//! - `name`: required, 1-100 characters
//! - `email`: required, email-shaped, at most 255 characters
//! - `company`: optional, at most 200 characters
//! - `message`: required, 10-5000 characters
//!
//! Every check runs on the trimmed value. Lengths count Unicode scalar values.

use crate::models::{ContactForm, ContactSubmission, Field};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Shape a field's value must have beyond its length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `local@domain.tld`
    Email,
}

impl Format {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Email => EMAIL_REGEX.is_match(value),
        }
    }
}

/// User-facing messages for each way a field can fail.
#[derive(Debug, Clone, Copy)]
pub struct RuleMessages {
    pub required: &'static str,
    pub too_short: &'static str,
    pub too_long: &'static str,
    pub invalid_format: &'static str,
}

/// Constraints for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub required: bool,
    pub min_chars: usize,
    pub max_chars: usize,
    pub format: Option<Format>,
    pub messages: RuleMessages,
}

/// The contact form rules, in display order.
pub static CONTACT_RULES: [FieldRule; 4] = [
    FieldRule {
        field: Field::Name,
        required: true,
        min_chars: 1,
        max_chars: 100,
        format: None,
        messages: RuleMessages {
            required: "Name is required",
            too_short: "Name is required",
            too_long: "Name must be 100 characters or fewer",
            invalid_format: "Invalid name",
        },
    },
    FieldRule {
        field: Field::Email,
        required: true,
        min_chars: 1,
        max_chars: 255,
        format: Some(Format::Email),
        messages: RuleMessages {
            required: "Email is required",
            too_short: "Invalid email address",
            too_long: "Email must be 255 characters or fewer",
            invalid_format: "Invalid email address",
        },
    },
    FieldRule {
        field: Field::Company,
        required: false,
        min_chars: 0,
        max_chars: 200,
        format: None,
        messages: RuleMessages {
            required: "Company name is required",
            too_short: "Company name is too short",
            too_long: "Company name must be 200 characters or fewer",
            invalid_format: "Invalid company name",
        },
    },
    FieldRule {
        field: Field::Message,
        required: true,
        min_chars: 10,
        max_chars: 5000,
        format: None,
        messages: RuleMessages {
            required: "Message is required",
            too_short: "Message must be at least 10 characters",
            too_long: "Message must be 5000 characters or fewer",
            invalid_format: "Invalid message",
        },
    },
];

/// Class of a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Required,
    TooShort,
    TooLong,
    InvalidFormat,
}

impl Violation {
    /// Short problem class, safe for server responses.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooShort => "too short",
            Self::TooLong => "too long",
            Self::InvalidFormat => "invalid format",
        }
    }
}

/// A single field's validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub violation: Violation,
    pub message: &'static str,
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message)
    }
}

/// Failures keyed by field, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, ValidationError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Drop the error for one field, e.g. once the user edits it.
    pub fn clear(&mut self, field: Field) -> Option<ValidationError> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.values()
    }

    /// One-line description naming each failing field and its problem class.
    ///
    /// Never includes submitted values.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .iter()
            .map(|e| format!("{} ({})", e.field, e.violation.describe()))
            .collect();
        format!("Invalid submission: {}", parts.join(", "))
    }

    fn insert(&mut self, error: ValidationError) {
        self.0.insert(error.field, error);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

impl FieldRule {
    /// Check a trimmed value against this rule.
    ///
    /// Reports the first failing check in the order required, too short,
    /// too long, format. An empty optional value always passes.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        let fail = |violation, message| {
            Err(ValidationError {
                field: self.field,
                violation,
                message,
            })
        };

        if value.is_empty() {
            if self.required {
                return fail(Violation::Required, self.messages.required);
            }
            return Ok(());
        }

        let chars = value.chars().count();
        if chars < self.min_chars {
            return fail(Violation::TooShort, self.messages.too_short);
        }
        if chars > self.max_chars {
            return fail(Violation::TooLong, self.messages.too_long);
        }
        if let Some(format) = self.format {
            if !format.matches(value) {
                return fail(Violation::InvalidFormat, self.messages.invalid_format);
            }
        }
        Ok(())
    }
}

/// Validator applying a rule table to whole forms.
#[derive(Debug, Clone, Copy)]
pub struct ContactValidator {
    rules: &'static [FieldRule],
}

impl Default for ContactValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactValidator {
    /// Create a validator over [`CONTACT_RULES`].
    pub fn new() -> Self {
        Self {
            rules: &CONTACT_RULES,
        }
    }

    /// Check a single field's raw value.
    pub fn validate_field(&self, field: Field, value: &str) -> Result<(), ValidationError> {
        match self.rules.iter().find(|r| r.field == field) {
            Some(rule) => rule.check(value.trim()),
            None => Ok(()),
        }
    }

    /// Validate every field, returning the trimmed submission or all failures.
    pub fn validate(&self, form: &ContactForm) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();
        for rule in self.rules {
            if let Err(e) = rule.check(form.get(rule.field).trim()) {
                errors.insert(e);
            }
        }

        if !errors.is_empty() {
            debug!(failed = errors.len(), "Contact form rejected");
            return Err(errors);
        }

        let company = form
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(ContactSubmission {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            company,
            message: form.message.trim().to_string(),
        })
    }
}

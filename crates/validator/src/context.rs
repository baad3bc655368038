//! Per-call state: the context handed to each validator, a validator's
//! result, and the field-level findings returned to the caller.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a [`Validator`](crate::Validator) sees during one validation call.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// The payload being validated.
    pub subject: &'a Value,
    /// Fields found to be set during presence detection.
    pub known_set_fields: &'a IndexSet<String>,
    /// Path to read instead of the validator's own field.
    pub override_field: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context without an override field.
    pub fn new(subject: &'a Value, known_set_fields: &'a IndexSet<String>) -> Self {
        Self {
            subject,
            known_set_fields,
            override_field: None,
        }
    }

    /// Reads `field` instead of the validator's bound field.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_override(mut self, field: &'a str) -> Self {
        self.override_field = Some(field);
        self
    }

    /// The path to read: the override field when set, else `bound`.
    pub fn field_path<'b>(&self, bound: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.override_field.unwrap_or(bound)
    }

    /// Whether any of `fields` was found set during presence detection.
    pub fn any_set<'f>(&self, fields: impl IntoIterator<Item = &'f String>) -> bool {
        fields
            .into_iter()
            .any(|f| self.known_set_fields.contains(f))
    }
}

/// Outcome of one validator invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    error_codes: IndexSet<String>,
    unset: bool,
}

impl ValidationResult {
    /// A passing result for a set field.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result for a field that is not set.
    pub fn unset() -> Self {
        Self {
            error_codes: IndexSet::new(),
            unset: true,
        }
    }

    /// Records an error code; duplicates are kept once, in first-seen order.
    pub fn add(&mut self, code: &str) {
        if !self.error_codes.contains(code) {
            self.error_codes.insert(code.to_owned());
        }
    }

    /// Whether the field was not set.
    pub fn is_unset(&self) -> bool {
        self.unset
    }

    /// Whether any error code was recorded.
    pub fn has_errors(&self) -> bool {
        !self.error_codes.is_empty()
    }

    /// Recorded error codes in the order they were added.
    pub fn error_codes(&self) -> impl Iterator<Item = &str> {
        self.error_codes.iter().map(String::as_str)
    }

    /// Consumes the result, returning its error codes.
    pub fn into_error_codes(self) -> Vec<String> {
        self.error_codes.into_iter().collect()
    }
}

/// The error codes recorded for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    /// Field path as declared in the rule.
    pub field: String,
    /// Error codes in directive evaluation order.
    pub error_codes: Vec<String>,
}

impl FieldErrors {
    /// Creates an entry.
    pub fn new<I, S>(field: impl Into<String>, error_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            error_codes: error_codes.into_iter().map(Into::into).collect(),
        }
    }
}

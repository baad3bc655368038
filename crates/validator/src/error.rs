//! Error types for rule compilation and rule execution
//!
//! Three distinct failure classes exist and they never mix:
//!
//! - [`ConfigError`]: a malformed rule set. Raised only while a
//!   [`RuleValidator`](crate::RuleValidator) is being built; the engine is
//!   never produced in that case.
//! - Field-level findings: ordinary output of a validation call, returned as
//!   [`FieldErrors`](crate::FieldErrors) values, not as errors.
//! - [`ValidateError`] / [`SubjectError`]: an unexpected condition while
//!   reading the subject or calling an external component. These are
//!   internal errors and must not be rendered as per-field messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::registry::ExternalError;
use crate::rule::RuleType;

/// Result type for rule compilation and configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// A rule set could not be compiled into a validator chain.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule list was empty.
    #[error("no rules specified for validator")]
    NoRules,

    /// A rule had fewer than two tokens.
    #[error("rule is invalid (must have at least an identifier and a type): {rule:?}")]
    RuleTooShort { rule: Vec<String> },

    /// None of the rule's directives named a supported type.
    #[error("unable to determine the type of rule for field '{field}': {rule:?}")]
    UnknownRuleType { field: String, rule: Vec<String> },

    /// A `RULE:` reference was used but no rule registry was configured.
    #[error(
        "field '{field}' references the external rule '{reference}', but no rule registry is set"
    )]
    MissingRuleRegistry { field: String, reference: String },

    /// A `RULE:` reference named a rule that is not in the registry.
    #[error(
        "field '{field}' references the external rule '{reference}', but no rule with that name exists"
    )]
    UnknownRuleReference { field: String, reference: String },

    /// A directive is not supported by the rule's type.
    #[error("unsupported operation '{operation}' for {rule_type} field '{field}'")]
    UnknownOperation {
        field: String,
        rule_type: RuleType,
        operation: String,
    },

    /// A directive had the wrong number of components.
    #[error(
        "{operation} operation on field '{field}' expects {min} to {max} components (found {actual})"
    )]
    Arity {
        field: String,
        operation: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// A directive parameter could not be interpreted.
    #[error("invalid parameter for {operation} operation on field '{field}': {reason}")]
    InvalidParameter {
        field: String,
        operation: String,
        reason: String,
    },

    /// A directive would emit an error code, but neither the directive, the
    /// type marker nor the engine supplies one.
    #[error("{operation} operation on field '{field}' has no error code and no default is set")]
    MissingErrorCode { field: String, operation: String },

    /// `EXT` was used but no component lookup was configured.
    #[error(
        "field '{field}' relies on an external component to validate, but no component lookup is available"
    )]
    MissingComponentLookup { field: String },

    /// `EXT` named a component the lookup does not know.
    #[error("no external component named '{component}' available to validate field '{field}'")]
    UnknownComponent { field: String, component: String },

    /// A configuration file could not be read.
    #[error("failed to read configuration from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file's extension does not select a known format.
    #[error("unsupported configuration format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// TOML configuration could not be deserialized.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON configuration could not be deserialized.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns the field the error is about, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownRuleType { field, .. }
            | Self::MissingRuleRegistry { field, .. }
            | Self::UnknownRuleReference { field, .. }
            | Self::UnknownOperation { field, .. }
            | Self::Arity { field, .. }
            | Self::InvalidParameter { field, .. }
            | Self::MissingErrorCode { field, .. }
            | Self::MissingComponentLookup { field }
            | Self::UnknownComponent { field, .. } => Some(field),
            Self::RuleTooShort { rule } => rule.first().map(String::as_str),
            Self::NoRules
            | Self::Io { .. }
            | Self::UnsupportedFormat { .. }
            | Self::Toml(_)
            | Self::Json(_) => None,
        }
    }
}

// ============================================================================
// UNEXPECTED ERRORS
// ============================================================================

/// Reading a field from the subject, or delegating to an external
/// component, failed for a reason other than a validation finding.
#[derive(Debug, Error)]
pub enum SubjectError {
    /// A nested object was expected on the path but something else was found.
    #[error("expected an object at '{path}' but found {found}")]
    NotAnObject { path: String, found: &'static str },

    /// The field holds a value of the wrong kind for its rule type.
    #[error("field '{path}' should hold {expected} but holds {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An external component returned an error.
    #[error("external component '{component}' failed while validating field '{field}'")]
    External {
        field: String,
        component: String,
        #[source]
        source: ExternalError,
    },
}

/// The validation pass during which an unexpected error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Pass 1, presence detection.
    PresenceCheck,
    /// Pass 2, directive evaluation.
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PresenceCheck => f.write_str("checking presence of"),
            Self::Validation => f.write_str("validating"),
        }
    }
}

/// An unexpected error that aborted a validation call.
#[derive(Debug, Error)]
#[error("unexpected error while {stage} field '{field}'")]
pub struct ValidateError {
    /// Chain field being processed when the error occurred.
    pub field: String,
    /// Pass in which the error occurred.
    pub stage: Stage,
    /// Underlying failure.
    #[source]
    pub source: SubjectError,
}

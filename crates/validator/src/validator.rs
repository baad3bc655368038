//! The compiled, per-field validator

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexSet;
use serde_json::Value;

use crate::context::{ValidationContext, ValidationResult};
use crate::error::SubjectError;

/// A compiled rule bound to one field.
///
/// Validators are immutable once built and hold no per-call state, so a
/// single instance serves concurrent validation calls.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Evaluates the rule's directives against the context's subject.
    ///
    /// Findings are returned in the [`ValidationResult`]; `Err` is reserved
    /// for unexpected failures.
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<ValidationResult, SubjectError>;

    /// Whether a failure of this field ends the validation call.
    fn stop_all_on_fail(&self) -> bool;

    /// Every error code this validator can emit.
    fn codes_in_use(&self) -> BTreeSet<String>;

    /// Fields that must be set and valid before this one is considered.
    fn depends_on_fields(&self) -> &IndexSet<String>;

    /// Whether `field` holds a value in `subject`.
    fn is_set(&self, field: &str, subject: &Value) -> Result<bool, SubjectError>;
}

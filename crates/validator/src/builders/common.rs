//! Directive handling shared by every rule type

use std::collections::BTreeSet;
use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::Value;

use crate::context::{ValidationContext, ValidationResult};
use crate::error::{ConfigError, ConfigResult, SubjectError};
use crate::op::Operation;
use crate::registry::ExternalValidator;
use crate::rule::{RuleType, path_dependencies};

use super::BuilderSettings;

pub(crate) const OP_REQUIRED: &str = "REQ";
pub(crate) const OP_STOP_ALL: &str = "STOPALL";
pub(crate) const OP_BREAK: &str = "BREAK";
pub(crate) const OP_MEX: &str = "MEX";
pub(crate) const OP_EXT: &str = "EXT";
pub(crate) const OP_IN: &str = "IN";
pub(crate) const OP_LEN: &str = "LEN";

/// Written in place of a `LEN` or `RANGE` bound to leave it open.
pub(crate) const UNBOUNDED: &str = "*";

// ============================================================================
// FIELD RULE
// ============================================================================

/// Settings every validator carries regardless of its type.
#[derive(Debug)]
pub(crate) struct FieldRule {
    pub(crate) field: String,
    pub(crate) rule_type: RuleType,
    pub(crate) dependencies: IndexSet<String>,
    pub(crate) default_code: String,
    pub(crate) required: Option<String>,
    pub(crate) stop_all: bool,
    pub(crate) codes: BTreeSet<String>,
}

impl FieldRule {
    pub(crate) fn new(rule_type: RuleType, field: &str, default_code: String) -> Self {
        let mut codes = BTreeSet::new();
        if !default_code.is_empty() {
            codes.insert(default_code.clone());
        }

        Self {
            field: field.to_owned(),
            rule_type,
            dependencies: path_dependencies(field),
            default_code,
            required: None,
            stop_all: false,
            codes,
        }
    }

    /// Resolves the code a directive emits and records it as in use.
    pub(crate) fn code(&mut self, op: &Operation, index: usize) -> ConfigResult<String> {
        let code = op.code_or(index, &self.field, &self.default_code)?;
        self.codes.insert(code.clone());
        Ok(code)
    }

    /// Result for a field that is not set: only `REQ` can fail it.
    pub(crate) fn unset_result(&self) -> ValidationResult {
        let mut result = ValidationResult::unset();
        if let Some(code) = &self.required {
            result.add(code);
        }
        result
    }

    pub(crate) fn unknown(&self, op: &Operation) -> ConfigError {
        ConfigError::UnknownOperation {
            field: self.field.clone(),
            rule_type: self.rule_type,
            operation: op.name().to_owned(),
        }
    }
}

// ============================================================================
// COMMON OPERATIONS
// ============================================================================

/// Directives with identical behavior for every rule type.
pub(crate) enum CommonOp {
    /// Stop evaluating this field's directives if it already failed.
    Break,
    /// Fail if any of the named fields is set.
    Mex { fields: Vec<String>, code: String },
    /// Delegate to an external component.
    Ext {
        component: String,
        validator: Arc<dyn ExternalValidator>,
        code: String,
    },
}

impl fmt::Debug for CommonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Break => f.write_str("Break"),
            Self::Mex { fields, code } => f
                .debug_struct("Mex")
                .field("fields", fields)
                .field("code", code)
                .finish(),
            Self::Ext {
                component, code, ..
            } => f
                .debug_struct("Ext")
                .field("component", component)
                .field("code", code)
                .finish_non_exhaustive(),
        }
    }
}

impl CommonOp {
    /// Evaluates the directive for a set field whose JSON value is `value`.
    pub(crate) fn apply(
        &self,
        field: &str,
        value: &Value,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) -> Result<ControlFlow<()>, SubjectError> {
        match self {
            Self::Break => {
                if result.has_errors() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            Self::Mex { fields, code } => {
                if ctx.any_set(fields) {
                    result.add(code);
                }
            }
            Self::Ext {
                component,
                validator,
                code,
            } => {
                let valid =
                    validator
                        .validate(value)
                        .map_err(|source| SubjectError::External {
                            field: field.to_owned(),
                            component: component.clone(),
                            source,
                        })?;
                if !valid {
                    result.add(code);
                }
            }
        }

        Ok(ControlFlow::Continue(()))
    }
}

/// How [`BuilderSettings::parse_common`] treated a directive.
pub(crate) enum Parsed {
    /// The directive configured the [`FieldRule`] and needs no evaluation.
    Handled,
    /// The directive is evaluated at call time.
    Op(CommonOp),
    /// The directive is not common; the type's builder must handle it.
    Other,
}

impl BuilderSettings {
    pub(crate) fn parse_common(&self, rule: &mut FieldRule, op: &Operation) -> ConfigResult<Parsed> {
        let field = rule.field.clone();

        match op.name() {
            name if name == rule.rule_type.marker() => {
                op.expect_arity(&field, 1, 2)?;
                Ok(Parsed::Handled)
            }
            OP_REQUIRED => {
                op.expect_arity(&field, 1, 2)?;
                rule.required = Some(rule.code(op, 1)?);
                Ok(Parsed::Handled)
            }
            OP_STOP_ALL => {
                op.expect_arity(&field, 1, 1)?;
                rule.stop_all = true;
                Ok(Parsed::Handled)
            }
            OP_BREAK => {
                op.expect_arity(&field, 1, 1)?;
                Ok(Parsed::Op(CommonOp::Break))
            }
            OP_MEX => {
                op.expect_arity(&field, 2, 3)?;
                let fields = op.list(1);
                if fields.is_empty() {
                    return Err(op.invalid(&field, "no fields to be mutually exclusive with"));
                }
                if fields.contains(&field) {
                    return Err(op.invalid(&field, "a field cannot exclude itself"));
                }
                let code = rule.code(op, 2)?;
                Ok(Parsed::Op(CommonOp::Mex { fields, code }))
            }
            OP_EXT => {
                op.expect_arity(&field, 2, 3)?;
                let lookup = self
                    .components
                    .as_ref()
                    .ok_or_else(|| ConfigError::MissingComponentLookup {
                        field: field.clone(),
                    })?;
                let component = op.part(1).unwrap_or_default().to_owned();
                let validator =
                    lookup
                        .lookup(&component)
                        .ok_or_else(|| ConfigError::UnknownComponent {
                            field: field.clone(),
                            component: component.clone(),
                        })?;
                let code = rule.code(op, 2)?;
                Ok(Parsed::Op(CommonOp::Ext {
                    component,
                    validator,
                    code,
                }))
            }
            _ => Ok(Parsed::Other),
        }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Inclusive bounds for `LEN` and `RANGE`; `None` leaves a side open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds<T> {
    pub(crate) min: Option<T>,
    pub(crate) max: Option<T>,
}

impl<T> Bounds<T>
where
    T: FromStr + PartialOrd + Copy,
{
    /// Parses components 1 and 2 of `op` as the lower and upper bound.
    pub(crate) fn parse(op: &Operation, field: &str) -> ConfigResult<Self> {
        let bound = |index: usize| -> ConfigResult<Option<T>> {
            match op.part(index).map(str::trim) {
                None | Some(UNBOUNDED) => Ok(None),
                Some(raw) => raw
                    .parse::<T>()
                    .map(Some)
                    .map_err(|_| op.invalid(field, format!("'{raw}' is not a valid bound"))),
            }
        };

        let bounds = Self {
            min: bound(1)?,
            max: bound(2)?,
        };

        if let (Some(min), Some(max)) = (bounds.min, bounds.max)
            && min > max
        {
            return Err(op.invalid(field, "minimum is greater than maximum"));
        }

        Ok(bounds)
    }

    pub(crate) fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

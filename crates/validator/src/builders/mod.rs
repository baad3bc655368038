//! Per-type validator builders
//!
//! One builder exists per [`RuleType`]. Each turns a field's directive
//! tokens into a boxed [`Validator`], checking directive arity strictly and
//! rejecting directives its type does not support.
//!
//! | Directive | STR | OBJ | BOOL | INT | FLOAT |
//! |-----------|-----|-----|------|-----|-------|
//! | `REQ[:code]`, `STOPALL`, `BREAK` | ✓ | ✓ | ✓ | ✓ | ✓ |
//! | `MEX:f1,f2[:code]`, `EXT:name[:code]` | ✓ | ✓ | ✓ | ✓ | ✓ |
//! | `IN:v1,v2[:code]` | ✓ | | | ✓ | ✓ |
//! | `LEN:min:max[:code]` | ✓ | ✓ | | | |
//! | `RANGE:min:max[:code]` | | | | ✓ | ✓ |
//! | `REG:pattern[:code]`, `TRIM` | ✓ | | | | |
//! | `IS:true\|false[:code]` | | | ✓ | | |

mod boolean;
mod common;
mod numeric;
mod object;
mod string;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::Value;

use crate::context::{ValidationContext, ValidationResult};
use crate::error::{ConfigResult, SubjectError};
use crate::registry::ComponentLookup;
use crate::rule::RuleType;
use crate::subject;
use crate::validator::Validator;

pub use boolean::{BoolValidator, BoolValidatorBuilder};
pub use numeric::{
    FloatValidatorBuilder, IntValidatorBuilder, NumberValidator, Numeric, NumericValidatorBuilder,
};
pub use object::{ObjectValidator, ObjectValidatorBuilder};
pub use string::{StringValidator, StringValidatorBuilder};

use common::FieldRule;

// ============================================================================
// BUILDER SETTINGS
// ============================================================================

/// Configuration shared by all builders of one engine.
#[derive(Clone, Default)]
pub struct BuilderSettings {
    /// Code emitted by directives without an override when the type marker
    /// carries none either.
    pub default_error_code: String,
    /// Resolves `EXT:name` directives.
    pub components: Option<Arc<dyn ComponentLookup>>,
}

impl BuilderSettings {
    /// Creates settings with a default error code and no component lookup.
    pub fn new(default_error_code: impl Into<String>) -> Self {
        Self {
            default_error_code: default_error_code.into(),
            components: None,
        }
    }

    /// Sets the component lookup used by `EXT`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_components(mut self, components: Arc<dyn ComponentLookup>) -> Self {
        self.components = Some(components);
        self
    }

    fn field_rule(&self, rule_type: RuleType, field: &str, rule: &[String]) -> FieldRule {
        let default_code = rule_type.default_error_code(rule, &self.default_error_code);
        FieldRule::new(rule_type, field, default_code)
    }
}

impl fmt::Debug for BuilderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderSettings")
            .field("default_error_code", &self.default_error_code)
            .field("components", &self.components.is_some())
            .finish()
    }
}

// ============================================================================
// BUILDER TRAIT
// ============================================================================

/// Compiles the directives of one rule type.
pub trait ValidatorBuilder: Send + Sync {
    /// The rule type this builder handles.
    fn rule_type(&self) -> RuleType;

    /// Builds a validator for `field` from its directives (the rule minus
    /// the field name, with references already resolved).
    fn build(&self, field: &str, rule: &[String]) -> ConfigResult<Box<dyn Validator>>;
}

/// One builder per rule type, keyed by the type.
pub fn standard_builders(
    settings: &BuilderSettings,
) -> HashMap<RuleType, Box<dyn ValidatorBuilder>> {
    let builders: [Box<dyn ValidatorBuilder>; 5] = [
        Box::new(StringValidatorBuilder::new(settings.clone())),
        Box::new(ObjectValidatorBuilder::new(settings.clone())),
        Box::new(BoolValidatorBuilder::new(settings.clone())),
        Box::new(IntValidatorBuilder::new(settings.clone())),
        Box::new(FloatValidatorBuilder::new(settings.clone())),
    ];

    builders.into_iter().map(|b| (b.rule_type(), b)).collect()
}

// ============================================================================
// TYPED RULES
// ============================================================================

/// The type-specific half of a validator.
///
/// Presence, `REQ` and the [`Validator`] bookkeeping are shared; a typed
/// rule only says how to read its value and how to check it.
pub(crate) trait TypedRule: Send + Sync + fmt::Debug {
    /// The value handed to [`TypedRule::check`].
    type Value<'v>;

    fn rule(&self) -> &FieldRule;

    /// Interprets a non-null leaf. `Ok(None)` means the value counts as
    /// not set (an empty string, for example).
    fn convert<'v>(&self, path: &str, raw: &'v Value)
    -> Result<Option<Self::Value<'v>>, SubjectError>;

    /// Evaluates the directives, in declaration order, for a set value.
    fn check(
        &self,
        path: &str,
        raw: &Value,
        value: Self::Value<'_>,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) -> Result<(), SubjectError>;
}

impl<T: TypedRule> Validator for T {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<ValidationResult, SubjectError> {
        let rule = self.rule();
        let path = ctx.field_path(&rule.field);

        let value = match subject::resolve(ctx.subject, path)? {
            Some(raw) => self.convert(path, raw)?.map(|value| (raw, value)),
            None => None,
        };

        let Some((raw, value)) = value else {
            return Ok(rule.unset_result());
        };

        let mut result = ValidationResult::new();
        self.check(path, raw, value, ctx, &mut result)?;
        Ok(result)
    }

    fn stop_all_on_fail(&self) -> bool {
        self.rule().stop_all
    }

    fn codes_in_use(&self) -> BTreeSet<String> {
        self.rule().codes.clone()
    }

    fn depends_on_fields(&self) -> &IndexSet<String> {
        &self.rule().dependencies
    }

    fn is_set(&self, field: &str, subject: &Value) -> Result<bool, SubjectError> {
        match subject::resolve(subject, field)? {
            Some(raw) => Ok(self.convert(field, raw)?.is_some()),
            None => Ok(false),
        }
    }
}

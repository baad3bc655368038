//! The rule-driven validation engine
//!
//! Building and running are separate phases with separate types:
//!
//! - [`RuleValidatorBuilder`] collects rules and collaborators and compiles
//!   them once with [`RuleValidatorBuilder::build`].
//! - [`RuleValidator`] owns the resulting chain. It only exposes `&self`
//!   methods, so one instance can be shared across threads and validate
//!   many subjects concurrently.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::Value;

use crate::builders::{BuilderSettings, standard_builders};
use crate::catalog::ErrorCodeUser;
use crate::context::{FieldErrors, ValidationContext};
use crate::error::{ConfigError, ConfigResult, Stage, ValidateError};
use crate::registry::{ComponentLookup, RuleRegistry};
use crate::rule::{RuleType, resolve_directives};
use crate::validator::Validator;

// ============================================================================
// BUILD PHASE
// ============================================================================

/// Collects the configuration of a [`RuleValidator`].
///
/// # Examples
///
/// ```
/// use ruleval_validator::RuleValidatorBuilder;
/// use serde_json::json;
///
/// let validator = RuleValidatorBuilder::new(vec![
///     vec!["name", "STR", "REQ:NAME_MISSING"],
///     vec!["age", "INT", "RANGE:0:150"],
/// ])
/// .default_error_code("INVALID")
/// .build()?;
///
/// let errors = validator.validate(&json!({ "age": 200 }))?;
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors[0].field, "name");
/// assert_eq!(errors[1].error_codes, ["INVALID"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct RuleValidatorBuilder {
    name: String,
    rules: Vec<Vec<String>>,
    default_error_code: String,
    rule_registry: Option<RuleRegistry>,
    components: Option<Arc<dyn ComponentLookup>>,
}

impl RuleValidatorBuilder {
    /// Starts a builder from rules of the form `[field, directive, ...]`.
    pub fn new<I, R, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|rule| rule.into_iter().map(Into::into).collect())
                .collect(),
            ..Self::default()
        }
    }

    /// Name reported alongside the codes in use.
    #[must_use = "builder methods must be chained or built"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Code emitted by directives that neither carry an override nor
    /// belong to a type marker with one.
    #[must_use = "builder methods must be chained or built"]
    pub fn default_error_code(mut self, code: impl Into<String>) -> Self {
        self.default_error_code = code.into();
        self
    }

    /// Registry consulted for `RULE:name` rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule_registry(mut self, registry: RuleRegistry) -> Self {
        self.rule_registry = Some(registry);
        self
    }

    /// Lookup consulted for `EXT:name` directives.
    #[must_use = "builder methods must be chained or built"]
    pub fn component_lookup(mut self, components: Arc<dyn ComponentLookup>) -> Self {
        self.components = Some(components);
        self
    }

    /// Compiles every rule, in declaration order, into the validator chain.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered; no engine is produced
    /// in that case.
    pub fn build(self) -> ConfigResult<RuleValidator> {
        if self.rules.is_empty() {
            return Err(ConfigError::NoRules);
        }

        let settings = BuilderSettings {
            default_error_code: self.default_error_code.clone(),
            components: self.components.clone(),
        };
        let builders = standard_builders(&settings);

        let mut codes_in_use = BTreeSet::new();
        if !self.default_error_code.is_empty() {
            codes_in_use.insert(self.default_error_code.clone());
        }

        let mut chain = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let directives = resolve_directives(rule, self.rule_registry.as_ref())?;
            let field = rule[0].as_str();
            let rule_type = RuleType::extract(field, &directives)?;
            let builder =
                builders
                    .get(&rule_type)
                    .ok_or_else(|| ConfigError::UnknownRuleType {
                        field: field.to_owned(),
                        rule: directives.clone(),
                    })?;
            let validator = builder.build(field, &directives)?;

            tracing::debug!(field, %rule_type, directives = ?directives, "compiled rule");

            codes_in_use.extend(validator.codes_in_use());
            chain.push(ValidatorLink {
                field: field.to_owned(),
                validator,
            });
        }

        tracing::info!(
            name = %self.name,
            fields = chain.len(),
            codes = codes_in_use.len(),
            "rule validator ready"
        );

        Ok(RuleValidator {
            name: self.name,
            chain,
            codes_in_use,
        })
    }
}

impl fmt::Debug for RuleValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleValidatorBuilder")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("default_error_code", &self.default_error_code)
            .field("rule_registry", &self.rule_registry)
            .field("components", &self.components.is_some())
            .finish()
    }
}

// ============================================================================
// EXECUTION PHASE
// ============================================================================

#[derive(Debug)]
struct ValidatorLink {
    field: String,
    validator: Box<dyn Validator>,
}

/// A compiled, immutable chain of field validators.
#[derive(Debug)]
pub struct RuleValidator {
    name: String,
    chain: Vec<ValidatorLink>,
    codes_in_use: BTreeSet<String>,
}

/// Running state of one validation call.
#[derive(Debug, Default)]
struct CallState {
    problem_fields: IndexSet<String>,
    unset_fields: IndexSet<String>,
    set_fields: IndexSet<String>,
}

impl CallState {
    /// The gate: a field is only considered while none of its ancestors is
    /// unset or failed.
    fn parents_okay(&self, validator: &dyn Validator) -> bool {
        validator.depends_on_fields().iter().all(|parent| {
            let okay =
                !self.problem_fields.contains(parent) && !self.unset_fields.contains(parent);
            if !okay {
                tracing::trace!(parent = %parent, "parent is not okay");
            }
            okay
        })
    }
}

impl RuleValidator {
    /// Validates `subject`, returning the findings in chain order.
    ///
    /// An empty list means the subject is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError`] when the subject's shape prevents a field
    /// from being read, or when an external component fails. No findings
    /// are returned in that case.
    pub fn validate(&self, subject: &Value) -> Result<Vec<FieldErrors>, ValidateError> {
        let mut state = CallState::default();

        for link in &self.chain {
            let field = link.field.as_str();
            tracing::trace!(field, "checking field set");

            if !state.parents_okay(link.validator.as_ref()) {
                tracing::debug!(field, "skipping set check, one or more parent objects invalid");
                continue;
            }

            let set = link
                .validator
                .is_set(field, subject)
                .map_err(|source| ValidateError {
                    field: field.to_owned(),
                    stage: Stage::PresenceCheck,
                    source,
                })?;

            if set {
                state.set_fields.insert(field.to_owned());
            } else {
                state.unset_fields.insert(field.to_owned());
            }
        }

        let set_fields = std::mem::take(&mut state.set_fields);
        let ctx = ValidationContext::new(subject, &set_fields);
        let mut field_errors = Vec::new();

        for link in &self.chain {
            let field = link.field.as_str();
            tracing::trace!(field, "validating field");

            if !state.parents_okay(link.validator.as_ref()) {
                tracing::debug!(field, "skipping field, one or more parent objects invalid");
                continue;
            }

            let result = link
                .validator
                .validate(&ctx)
                .map_err(|source| ValidateError {
                    field: field.to_owned(),
                    stage: Stage::Validation,
                    source,
                })?;

            if result.is_unset() {
                tracing::trace!(field, "field is unset");
                state.unset_fields.insert(field.to_owned());
            }

            if !result.has_errors() {
                continue;
            }

            let error_codes = result.into_error_codes();
            tracing::debug!(field, errors = error_codes.len(), "field has errors");
            state.problem_fields.insert(field.to_owned());
            field_errors.push(FieldErrors {
                field: field.to_owned(),
                error_codes,
            });

            if link.validator.stop_all_on_fail() {
                tracing::debug!(field, "stopping validation after failure");
                break;
            }
        }

        Ok(field_errors)
    }

    /// Every error code the chain can emit, plus the engine name.
    pub fn error_codes_in_use(&self) -> (&BTreeSet<String>, &str) {
        (&self.codes_in_use, &self.name)
    }

    /// The engine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chain fields in evaluation order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(|link| link.field.as_str())
    }

    /// Number of validators in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain holds no validators.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl ErrorCodeUser for RuleValidator {
    fn error_codes_in_use(&self) -> (&BTreeSet<String>, &str) {
        RuleValidator::error_codes_in_use(self)
    }
}

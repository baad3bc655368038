//! `OBJ` rules

use std::ops::ControlFlow;

use serde_json::Value;

use super::common::{Bounds, CommonOp, FieldRule, OP_LEN, Parsed};
use super::{BuilderSettings, TypedRule, ValidatorBuilder};
use crate::context::{ValidationContext, ValidationResult};
use crate::error::{ConfigResult, SubjectError};
use crate::op::Operation;
use crate::rule::RuleType;
use crate::subject::mismatch;
use crate::validator::Validator;

#[derive(Debug)]
enum ObjectOp {
    Common(CommonOp),
    Len { bounds: Bounds<usize>, code: String },
}

/// Validates nested objects and arrays.
///
/// Any object or array is set, empty or not. `LEN` counts object members
/// or array elements.
#[derive(Debug)]
pub struct ObjectValidator {
    rule: FieldRule,
    ops: Vec<ObjectOp>,
}

impl TypedRule for ObjectValidator {
    type Value<'v> = &'v Value;

    fn rule(&self) -> &FieldRule {
        &self.rule
    }

    fn convert<'v>(&self, path: &str, raw: &'v Value) -> Result<Option<&'v Value>, SubjectError> {
        match raw {
            Value::Object(_) | Value::Array(_) => Ok(Some(raw)),
            other => Err(mismatch(path, "an object or an array", other)),
        }
    }

    fn check(
        &self,
        path: &str,
        raw: &Value,
        value: &Value,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) -> Result<(), SubjectError> {
        let len = match value {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        };

        for op in &self.ops {
            match op {
                ObjectOp::Common(common) => {
                    if let ControlFlow::Break(()) = common.apply(path, raw, ctx, result)? {
                        break;
                    }
                }
                ObjectOp::Len { bounds, code } => {
                    if !bounds.contains(len) {
                        result.add(code);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Builds [`ObjectValidator`]s.
#[derive(Debug, Clone)]
pub struct ObjectValidatorBuilder {
    settings: BuilderSettings,
}

impl ObjectValidatorBuilder {
    pub fn new(settings: BuilderSettings) -> Self {
        Self { settings }
    }
}

impl ValidatorBuilder for ObjectValidatorBuilder {
    fn rule_type(&self) -> RuleType {
        RuleType::Obj
    }

    fn build(&self, field: &str, rule: &[String]) -> ConfigResult<Box<dyn Validator>> {
        let mut field_rule = self.settings.field_rule(RuleType::Obj, field, rule);
        let mut ops = Vec::new();

        for raw in rule {
            let op = Operation::parse(raw);
            match self.settings.parse_common(&mut field_rule, &op)? {
                Parsed::Handled => {}
                Parsed::Op(common) => ops.push(ObjectOp::Common(common)),
                Parsed::Other if op.name() == OP_LEN => {
                    op.expect_arity(field, 3, 4)?;
                    ops.push(ObjectOp::Len {
                        bounds: Bounds::parse(&op, field)?,
                        code: field_rule.code(&op, 3)?,
                    });
                }
                Parsed::Other => return Err(field_rule.unknown(&op)),
            }
        }

        Ok(Box::new(ObjectValidator {
            rule: field_rule,
            ops,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use indexmap::IndexSet;
    use serde_json::json;

    fn build(rule: &[&str]) -> ConfigResult<Box<dyn Validator>> {
        let rule: Vec<String> = rule.iter().map(|s| (*s).to_owned()).collect();
        ObjectValidatorBuilder::new(BuilderSettings::new("OBJ_BAD")).build("address", &rule)
    }

    fn codes(rule: &[&str], subject: &Value) -> Vec<String> {
        let known = IndexSet::new();
        build(rule)
            .unwrap()
            .validate(&ValidationContext::new(subject, &known))
            .unwrap()
            .into_error_codes()
    }

    #[test]
    fn empty_object_is_set() {
        let validator = build(&["OBJ", "REQ"]).unwrap();
        assert!(validator.is_set("address", &json!({ "address": {} })).unwrap());
        assert!(!validator.is_set("address", &json!({ "address": null })).unwrap());
        assert_eq!(codes(&["OBJ", "REQ:NO_ADDR"], &json!({})), ["NO_ADDR"]);
    }

    #[test]
    fn length_counts_members_and_elements() {
        let rule = ["OBJ", "LEN:1:2:SIZE"];
        assert_eq!(codes(&rule, &json!({ "address": {} })), ["SIZE"]);
        assert_eq!(codes(&rule, &json!({ "address": { "a": 1 } })), Vec::<String>::new());
        assert_eq!(codes(&rule, &json!({ "address": [1, 2, 3] })), ["SIZE"]);
    }

    #[test]
    fn scalar_is_type_mismatch() {
        let validator = build(&["OBJ"]).unwrap();
        assert!(matches!(
            validator.is_set("address", &json!({ "address": "street" })),
            Err(SubjectError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_string_only_directives() {
        assert!(matches!(
            build(&["OBJ", "REG:x"]),
            Err(ConfigError::UnknownOperation { rule_type: RuleType::Obj, .. })
        ));
        assert!(matches!(build(&["OBJ", "LEN:1"]), Err(ConfigError::Arity { .. })));
    }
}

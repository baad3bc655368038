//! `BOOL` rules

use serde_json::Value;

use super::common::{CommonOp, FieldRule, Parsed};
use super::{BuilderSettings, TypedRule, ValidatorBuilder};
use crate::context::{ValidationContext, ValidationResult};
use crate::error::{ConfigResult, SubjectError};
use crate::op::Operation;
use crate::rule::RuleType;
use crate::subject::mismatch;
use crate::validator::Validator;

const OP_IS: &str = "IS";

#[derive(Debug)]
enum BoolOp {
    Common(CommonOp),
    Is { expected: bool, code: String },
}

/// Validates boolean fields. `false` is a set value.
#[derive(Debug)]
pub struct BoolValidator {
    rule: FieldRule,
    ops: Vec<BoolOp>,
}

impl TypedRule for BoolValidator {
    type Value<'v> = bool;

    fn rule(&self) -> &FieldRule {
        &self.rule
    }

    fn convert<'v>(&self, path: &str, raw: &'v Value) -> Result<Option<bool>, SubjectError> {
        raw.as_bool()
            .map(Some)
            .ok_or_else(|| mismatch(path, "a boolean", raw))
    }

    fn check(
        &self,
        path: &str,
        raw: &Value,
        value: bool,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) -> Result<(), SubjectError> {
        for op in &self.ops {
            match op {
                BoolOp::Common(common) => {
                    if common.apply(path, raw, ctx, result)?.is_break() {
                        break;
                    }
                }
                BoolOp::Is { expected, code } => {
                    if value != *expected {
                        result.add(code);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Builds [`BoolValidator`]s.
#[derive(Debug, Clone)]
pub struct BoolValidatorBuilder {
    settings: BuilderSettings,
}

impl BoolValidatorBuilder {
    pub fn new(settings: BuilderSettings) -> Self {
        Self { settings }
    }
}

impl ValidatorBuilder for BoolValidatorBuilder {
    fn rule_type(&self) -> RuleType {
        RuleType::Bool
    }

    fn build(&self, field: &str, rule: &[String]) -> ConfigResult<Box<dyn Validator>> {
        let mut field_rule = self.settings.field_rule(RuleType::Bool, field, rule);
        let mut ops = Vec::new();

        for raw in rule {
            let op = Operation::parse(raw);
            match self.settings.parse_common(&mut field_rule, &op)? {
                Parsed::Handled => {}
                Parsed::Op(common) => ops.push(BoolOp::Common(common)),
                Parsed::Other if op.name() == OP_IS => {
                    op.expect_arity(field, 2, 3)?;
                    let expected = match op.part(1).map(str::trim) {
                        Some("true") => true,
                        Some("false") => false,
                        other => {
                            return Err(op.invalid(
                                field,
                                format!("expected true or false, found {:?}", other.unwrap_or_default()),
                            ));
                        }
                    };
                    ops.push(BoolOp::Is {
                        expected,
                        code: field_rule.code(&op, 2)?,
                    });
                }
                Parsed::Other => return Err(field_rule.unknown(&op)),
            }
        }

        Ok(Box::new(BoolValidator {
            rule: field_rule,
            ops,
        }))
    }
}

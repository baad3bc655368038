//! `INT` and `FLOAT` rules
//!
//! Both types share one implementation parameterised by [`Numeric`].

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde_json::{Number, Value};

use super::common::{Bounds, CommonOp, FieldRule, OP_IN, Parsed};
use super::{BuilderSettings, TypedRule, ValidatorBuilder};
use crate::context::{ValidationContext, ValidationResult};
use crate::error::{ConfigResult, SubjectError};
use crate::op::Operation;
use crate::rule::RuleType;
use crate::subject::mismatch;
use crate::validator::Validator;

const OP_RANGE: &str = "RANGE";

/// A number type a rule can target.
pub trait Numeric:
    Copy + PartialOrd + FromStr + fmt::Debug + Send + Sync + 'static
{
    /// The rule type that selects this number type.
    const RULE_TYPE: RuleType;

    /// Description used in type mismatch errors.
    const EXPECTED: &'static str;

    /// Converts a JSON number, `None` if it cannot be represented.
    fn from_json(number: &Number) -> Option<Self>;

    /// Whether a parsed rule parameter can be compared against values.
    fn is_valid_bound(self) -> bool {
        true
    }
}

impl Numeric for i64 {
    const RULE_TYPE: RuleType = RuleType::Int;
    const EXPECTED: &'static str = "an integer";

    fn from_json(number: &Number) -> Option<Self> {
        number.as_i64()
    }
}

impl Numeric for f64 {
    const RULE_TYPE: RuleType = RuleType::Float;
    const EXPECTED: &'static str = "a number";

    fn from_json(number: &Number) -> Option<Self> {
        number.as_f64()
    }

    fn is_valid_bound(self) -> bool {
        self.is_finite()
    }
}

#[derive(Debug)]
enum NumberOp<N> {
    Common(CommonOp),
    In { allowed: Vec<N>, code: String },
    Range { bounds: Bounds<N>, code: String },
}

/// Validates numeric fields. Zero is a set value.
#[derive(Debug)]
pub struct NumberValidator<N> {
    rule: FieldRule,
    ops: Vec<NumberOp<N>>,
}

impl<N: Numeric> TypedRule for NumberValidator<N> {
    type Value<'v> = N;

    fn rule(&self) -> &FieldRule {
        &self.rule
    }

    fn convert<'v>(&self, path: &str, raw: &'v Value) -> Result<Option<N>, SubjectError> {
        match raw {
            Value::Number(n) => N::from_json(n)
                .map(Some)
                .ok_or_else(|| mismatch(path, N::EXPECTED, raw)),
            other => Err(mismatch(path, N::EXPECTED, other)),
        }
    }

    fn check(
        &self,
        path: &str,
        raw: &Value,
        value: N,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) -> Result<(), SubjectError> {
        for op in &self.ops {
            match op {
                NumberOp::Common(common) => {
                    if common.apply(path, raw, ctx, result)?.is_break() {
                        break;
                    }
                }
                NumberOp::In { allowed, code } => {
                    if !allowed.contains(&value) {
                        result.add(code);
                    }
                }
                NumberOp::Range { bounds, code } => {
                    if !bounds.contains(value) {
                        result.add(code);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Builds [`NumberValidator`]s for one [`Numeric`] type.
pub struct NumericValidatorBuilder<N> {
    settings: BuilderSettings,
    _number: PhantomData<fn() -> N>,
}

/// Builder for `INT` rules.
pub type IntValidatorBuilder = NumericValidatorBuilder<i64>;

/// Builder for `FLOAT` rules.
pub type FloatValidatorBuilder = NumericValidatorBuilder<f64>;

impl<N: Numeric> NumericValidatorBuilder<N> {
    pub fn new(settings: BuilderSettings) -> Self {
        Self {
            settings,
            _number: PhantomData,
        }
    }

    fn parse_op(&self, rule: &mut FieldRule, op: &Operation) -> ConfigResult<NumberOp<N>> {
        let field = rule.field.clone();

        match op.name() {
            OP_IN => {
                op.expect_arity(&field, 2, 3)?;
                let allowed = op
                    .list(1)
                    .iter()
                    .map(|member| {
                        member
                            .parse::<N>()
                            .ok()
                            .filter(|n| n.is_valid_bound())
                            .ok_or_else(|| op.invalid(&field, format!("'{member}' is not {}", N::EXPECTED)))
                    })
                    .collect::<ConfigResult<Vec<N>>>()?;
                if allowed.is_empty() {
                    return Err(op.invalid(&field, "no allowed values"));
                }
                Ok(NumberOp::In {
                    allowed,
                    code: rule.code(op, 2)?,
                })
            }
            OP_RANGE => {
                op.expect_arity(&field, 3, 4)?;
                let bounds = Bounds::<N>::parse(op, &field)?;
                if [bounds.min, bounds.max]
                    .into_iter()
                    .flatten()
                    .any(|bound| !bound.is_valid_bound())
                {
                    return Err(op.invalid(&field, "bounds must be finite numbers"));
                }
                Ok(NumberOp::Range {
                    bounds,
                    code: rule.code(op, 3)?,
                })
            }
            _ => Err(rule.unknown(op)),
        }
    }
}

impl<N> Clone for NumericValidatorBuilder<N> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            _number: PhantomData,
        }
    }
}

impl<N: Numeric> fmt::Debug for NumericValidatorBuilder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericValidatorBuilder")
            .field("rule_type", &N::RULE_TYPE)
            .field("settings", &self.settings)
            .finish()
    }
}

impl<N: Numeric> ValidatorBuilder for NumericValidatorBuilder<N> {
    fn rule_type(&self) -> RuleType {
        N::RULE_TYPE
    }

    fn build(&self, field: &str, rule: &[String]) -> ConfigResult<Box<dyn Validator>> {
        let mut field_rule = self.settings.field_rule(N::RULE_TYPE, field, rule);
        let mut ops = Vec::new();

        for raw in rule {
            let op = Operation::parse(raw);
            match self.settings.parse_common(&mut field_rule, &op)? {
                Parsed::Handled => {}
                Parsed::Op(common) => ops.push(NumberOp::Common(common)),
                Parsed::Other => ops.push(self.parse_op(&mut field_rule, &op)?),
            }
        }

        Ok(Box::new(NumberValidator::<N> {
            rule: field_rule,
            ops,
        }))
    }
}

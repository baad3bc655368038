//! `STR` rules

use std::borrow::Cow;

use indexmap::IndexSet;
use regex::Regex;
use serde_json::Value;

use super::common::{Bounds, CommonOp, FieldRule, OP_IN, OP_LEN, Parsed};
use super::{BuilderSettings, TypedRule, ValidatorBuilder};
use crate::context::{ValidationContext, ValidationResult};
use crate::error::{ConfigResult, SubjectError};
use crate::op::Operation;
use crate::rule::RuleType;
use crate::subject::mismatch;
use crate::validator::Validator;

const OP_REG: &str = "REG";
const OP_TRIM: &str = "TRIM";

#[derive(Debug)]
enum StringOp {
    Common(CommonOp),
    In { allowed: IndexSet<String>, code: String },
    Len { bounds: Bounds<usize>, code: String },
    Reg { pattern: Regex, code: String },
}

/// Validates string fields.
///
/// An empty string counts as not set. With `TRIM`, surrounding whitespace
/// is removed before presence is decided and before any directive runs, so
/// a blank string is not set either. `LEN` counts characters, not bytes.
#[derive(Debug)]
pub struct StringValidator {
    rule: FieldRule,
    trim: bool,
    ops: Vec<StringOp>,
}

impl TypedRule for StringValidator {
    type Value<'v> = &'v str;

    fn rule(&self) -> &FieldRule {
        &self.rule
    }

    fn convert<'v>(&self, path: &str, raw: &'v Value) -> Result<Option<&'v str>, SubjectError> {
        let Value::String(s) = raw else {
            return Err(mismatch(path, "a string", raw));
        };

        let s = if self.trim { s.trim() } else { s.as_str() };
        Ok((!s.is_empty()).then_some(s))
    }

    fn check(
        &self,
        path: &str,
        raw: &Value,
        value: &str,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) -> Result<(), SubjectError> {
        // External components see the trimmed text.
        let json: Cow<'_, Value> = match raw {
            Value::String(s) if s.len() != value.len() => Cow::Owned(Value::from(value)),
            _ => Cow::Borrowed(raw),
        };

        for op in &self.ops {
            match op {
                StringOp::Common(common) => {
                    if common.apply(path, &json, ctx, result)?.is_break() {
                        break;
                    }
                }
                StringOp::In { allowed, code } => {
                    if !allowed.contains(value) {
                        result.add(code);
                    }
                }
                StringOp::Len { bounds, code } => {
                    if !bounds.contains(value.chars().count()) {
                        result.add(code);
                    }
                }
                StringOp::Reg { pattern, code } => {
                    if !pattern.is_match(value) {
                        result.add(code);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Builds [`StringValidator`]s.
#[derive(Debug, Clone)]
pub struct StringValidatorBuilder {
    settings: BuilderSettings,
}

impl StringValidatorBuilder {
    pub fn new(settings: BuilderSettings) -> Self {
        Self { settings }
    }

    fn parse_op(&self, rule: &mut FieldRule, op: &Operation) -> ConfigResult<StringOp> {
        let field = rule.field.clone();

        match op.name() {
            OP_IN => {
                op.expect_arity(&field, 2, 3)?;
                let allowed: IndexSet<String> = op.list(1).into_iter().collect();
                if allowed.is_empty() {
                    return Err(op.invalid(&field, "no allowed values"));
                }
                Ok(StringOp::In {
                    allowed,
                    code: rule.code(op, 2)?,
                })
            }
            OP_LEN => {
                op.expect_arity(&field, 3, 4)?;
                Ok(StringOp::Len {
                    bounds: Bounds::parse(op, &field)?,
                    code: rule.code(op, 3)?,
                })
            }
            OP_REG => {
                op.expect_arity(&field, 2, 3)?;
                let source = op.part(1).unwrap_or_default();
                let pattern = Regex::new(&format!("^(?:{source})$"))
                    .map_err(|e| op.invalid(&field, e.to_string()))?;
                Ok(StringOp::Reg {
                    pattern,
                    code: rule.code(op, 2)?,
                })
            }
            _ => Err(rule.unknown(op)),
        }
    }
}

impl ValidatorBuilder for StringValidatorBuilder {
    fn rule_type(&self) -> RuleType {
        RuleType::Str
    }

    fn build(&self, field: &str, rule: &[String]) -> ConfigResult<Box<dyn Validator>> {
        let mut field_rule = self.settings.field_rule(RuleType::Str, field, rule);
        let mut trim = false;
        let mut ops = Vec::new();

        for raw in rule {
            let op = Operation::parse(raw);
            match self.settings.parse_common(&mut field_rule, &op)? {
                Parsed::Handled => {}
                Parsed::Op(common) => ops.push(StringOp::Common(common)),
                Parsed::Other if op.name() == OP_TRIM => {
                    op.expect_arity(field, 1, 1)?;
                    trim = true;
                }
                Parsed::Other => ops.push(self.parse_op(&mut field_rule, &op)?),
            }
        }

        Ok(Box::new(StringValidator {
            rule: field_rule,
            trim,
            ops,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::registry::{ComponentRegistry, ExternalError};
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn build(rule: &[&str]) -> ConfigResult<Box<dyn Validator>> {
        let components = ComponentRegistry::new();
        components.register("lowercase", |v: &Value| -> Result<bool, ExternalError> {
            Ok(v.as_str().is_some_and(|s| s == s.to_lowercase()))
        });
        let settings = BuilderSettings::new("INVALID").with_components(Arc::new(components));
        let rule: Vec<String> = rule.iter().map(|s| (*s).to_owned()).collect();
        StringValidatorBuilder::new(settings).build("name", &rule)
    }

    fn codes(rule: &[&str], subject: Value) -> Vec<String> {
        let validator = build(rule).unwrap();
        let known = IndexSet::new();
        let ctx = ValidationContext::new(&subject, &known);
        validator.validate(&ctx).unwrap().into_error_codes()
    }

    #[rstest]
    #[case(&["STR", "REQ"], json!({}), &["INVALID"])]
    #[case(&["STR", "REQ:MISSING"], json!({ "name": "" }), &["MISSING"])]
    #[case(&["STR", "REQ"], json!({ "name": "x" }), &[])]
    #[case(&["STR:NAME_BAD", "REQ"], json!({ "name": null }), &["NAME_BAD"])]
    #[case(&["STR"], json!({}), &[])]
    #[case(&["STR", "IN:a,b"], json!({ "name": "c" }), &["INVALID"])]
    #[case(&["STR", "IN:a,b:NOT_IN"], json!({ "name": "b" }), &[])]
    #[case(&["STR", "LEN:2:3:LEN_BAD"], json!({ "name": "abcd" }), &["LEN_BAD"])]
    #[case(&["STR", "LEN:2:*"], json!({ "name": "ab" }), &[])]
    #[case(&["STR", "LEN:1:2"], json!({ "name": "éé" }), &[])]
    #[case(&["STR", "REG:[a-z]+:FMT"], json!({ "name": "abc1" }), &["FMT"])]
    #[case(&["STR", "REG:[a-z]+:FMT"], json!({ "name": "abc" }), &[])]
    #[case(&["STR", "REG:\\d{2}::\\d{2}"], json!({ "name": "10:30" }), &[])]
    #[case(&["STR", "EXT:lowercase:CASE"], json!({ "name": "Abc" }), &["CASE"])]
    fn evaluates_directives(#[case] rule: &[&str], #[case] subject: Value, #[case] expected: &[&str]) {
        assert_eq!(codes(rule, subject), expected);
    }

    #[test]
    fn directives_run_in_declaration_order() {
        let found = codes(
            &["STR", "LEN:5:10:SHORT", "IN:abc:NOT_IN", "REG:x+:FMT"],
            json!({ "name": "abc" }),
        );
        assert_eq!(found, ["SHORT", "FMT"]);
    }

    #[test]
    fn break_stops_after_failure() {
        let rule = ["STR", "LEN:5:10:SHORT", "BREAK", "REG:x+:FMT"];
        assert_eq!(codes(&rule, json!({ "name": "abc" })), ["SHORT"]);
        assert_eq!(codes(&rule, json!({ "name": "abcdef" })), ["FMT"]);
    }

    #[test]
    fn trim_applies_to_presence_and_checks() {
        let rule = ["STR", "TRIM", "REQ:MISSING", "LEN:1:3:LEN_BAD"];
        assert_eq!(codes(&rule, json!({ "name": "   " })), ["MISSING"]);
        assert_eq!(codes(&rule, json!({ "name": "  abc  " })), Vec::<String>::new());
        assert_eq!(codes(&["STR", "LEN:1:3"], json!({ "name": " abc " })), ["INVALID"]);
    }

    #[test]
    fn mutual_exclusion_uses_known_set_fields() {
        let validator = build(&["STR", "MEX:alias,nick:MEX"]).unwrap();
        let subject = json!({ "name": "x", "nick": "y" });
        let mut known = IndexSet::new();
        known.insert("nick".to_owned());

        let result = validator
            .validate(&ValidationContext::new(&subject, &known))
            .unwrap();
        assert_eq!(result.into_error_codes(), ["MEX"]);
    }

    #[test]
    fn wrong_kind_is_unexpected() {
        let validator = build(&["STR"]).unwrap();
        let subject = json!({ "name": 5 });
        let known = IndexSet::new();
        let err = validator
            .validate(&ValidationContext::new(&subject, &known))
            .unwrap_err();
        assert!(matches!(err, SubjectError::TypeMismatch { expected: "a string", .. }));
    }

    #[test]
    fn codes_in_use_cover_overrides_and_default() {
        let validator = build(&["STR:DEF", "REQ:MISSING", "LEN:1:2", "IN:a:NOT_IN"]).unwrap();
        let codes: Vec<_> = validator.codes_in_use().into_iter().collect();
        assert_eq!(codes, ["DEF", "MISSING", "NOT_IN"]);
    }

    #[rstest]
    #[case(&["STR", "LEN:1"])]
    #[case(&["STR", "IN"])]
    #[case(&["STR", "REQ:A:B"])]
    #[case(&["STR", "STOPALL:X"])]
    #[case(&["STR:A:B"])]
    #[case(&["STR", "TRIM:X"])]
    fn rejects_bad_arity(#[case] rule: &[&str]) {
        assert!(matches!(build(rule), Err(ConfigError::Arity { .. })));
    }

    #[rstest]
    #[case(&["STR", "LEN:x:2"])]
    #[case(&["STR", "REG:(unclosed"])]
    #[case(&["STR", "IN:,"])]
    #[case(&["STR", "MEX:name"])]
    fn rejects_bad_parameters(#[case] rule: &[&str]) {
        assert!(matches!(build(rule), Err(ConfigError::InvalidParameter { .. })));
    }

    #[test]
    fn rejects_unknown_directives_and_components() {
        assert!(matches!(
            build(&["STR", "RANGE:1:2"]),
            Err(ConfigError::UnknownOperation { rule_type: RuleType::Str, .. })
        ));
        assert!(matches!(
            build(&["STR", "EXT:missing"]),
            Err(ConfigError::UnknownComponent { .. })
        ));

        let rule = vec!["STR".to_owned(), "EXT:lowercase".to_owned()];
        let err = StringValidatorBuilder::new(BuilderSettings::new("X"))
            .build("name", &rule)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingComponentLookup { .. }));
    }

    #[test]
    fn missing_default_code_is_rejected() {
        let rule = vec!["STR".to_owned(), "REQ".to_owned()];
        let err = StringValidatorBuilder::new(BuilderSettings::default())
            .build("name", &rule)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingErrorCode { .. }));
    }
}

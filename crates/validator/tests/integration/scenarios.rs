//! Whole-engine behaviour on representative rule sets.

use pretty_assertions::assert_eq;
use ruleval_validator::{
    ComponentRegistry, ConfigError, ExternalError, FieldErrors, RuleRegistry, RuleType,
    RuleValidatorBuilder, Stage, SubjectError,
};
use serde_json::{Value, json};
use std::sync::Arc;

use super::engine;

// ============================================================================
// PRESENCE AND REQUIRED FIELDS
// ============================================================================

#[test]
fn missing_required_name_is_the_only_finding() {
    let v = engine(&[&["name", "STR", "REQ"], &["age", "INT"]]);
    let errors = v.validate(&json!({ "age": 30 })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("name", ["INVALID"])]);
}

#[test]
fn valid_subject_yields_no_findings() {
    let v = engine(&[&["name", "STR", "REQ"], &["age", "INT", "RANGE:0:150"]]);
    assert!(v.validate(&json!({ "name": "Ada", "age": 36 })).unwrap().is_empty());
}

#[test]
fn null_counts_as_unset() {
    let v = engine(&[&["name", "STR", "REQ:NAME_REQ"]]);
    let errors = v.validate(&json!({ "name": null })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("name", ["NAME_REQ"])]);
}

// ============================================================================
// PARENT GATING
// ============================================================================

#[test]
fn absent_parent_skips_children() {
    let v = engine(&[&["a", "OBJ"], &["a.b", "STR", "REQ"]]);
    assert!(v.validate(&json!({})).unwrap().is_empty());
}

#[test]
fn present_parent_lets_children_run() {
    let v = engine(&[&["a", "OBJ"], &["a.b", "STR", "REQ"]]);
    let errors = v.validate(&json!({ "a": {} })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("a.b", ["INVALID"])]);
}

#[test]
fn gating_spans_every_ancestor() {
    let v = engine(&[
        &["a", "OBJ"],
        &["a.b", "OBJ", "REQ:B_REQ"],
        &["a.b.c", "STR", "REQ:C_REQ"],
    ]);

    let errors = v.validate(&json!({ "a": { "x": 1 } })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("a.b", ["B_REQ"])]);
}

#[test]
fn undeclared_parent_is_not_a_gate() {
    let v = engine(&[&["a.b", "STR", "REQ:B_REQ"]]);
    let errors = v.validate(&json!({})).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("a.b", ["B_REQ"])]);
}

// ============================================================================
// MUTUAL EXCLUSION
// ============================================================================

#[test]
fn mutual_exclusion_flags_the_declaring_field() {
    let v = engine(&[&["x", "STR", "MEX:y"], &["y", "STR"]]);

    let errors = v.validate(&json!({ "x": "1", "y": "2" })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("x", ["INVALID"])]);

    assert!(v.validate(&json!({ "x": "1" })).unwrap().is_empty());
    assert!(v.validate(&json!({ "y": "2" })).unwrap().is_empty());
}

#[test]
fn mutual_exclusion_sees_fields_declared_later() {
    let v = engine(&[&["x", "STR", "MEX:y,z:ONE_OF"], &["y", "INT"], &["z", "BOOL"]]);
    let errors = v.validate(&json!({ "x": "1", "z": false })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("x", ["ONE_OF"])]);
}

// ============================================================================
// RULE REFERENCES
// ============================================================================

#[test]
fn reference_behaves_like_inline_rule() {
    let registry: RuleRegistry = [("ageRule", vec!["INT", "REQ"])].into_iter().collect();
    let referenced = RuleValidatorBuilder::new(vec![vec!["age", "RULE:ageRule"]])
        .default_error_code("INVALID")
        .rule_registry(registry)
        .build()
        .unwrap();
    let inline = engine(&[&["age", "INT", "REQ"]]);

    for subject in [json!({}), json!({ "age": 1 }), json!({ "age": null }), json!({ "age": 0 })] {
        assert_eq!(
            referenced.validate(&subject).unwrap(),
            inline.validate(&subject).unwrap(),
            "subject {subject}"
        );
    }
}

#[test]
fn reference_errors_are_configuration_errors() {
    let err = RuleValidatorBuilder::new(vec![vec!["age", "RULE:ageRule"]])
        .default_error_code("INVALID")
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingRuleRegistry { .. }));

    let err = RuleValidatorBuilder::new(vec![vec!["age", "RULE:other"]])
        .default_error_code("INVALID")
        .rule_registry([("ageRule", vec!["INT"])].into_iter().collect())
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownRuleReference { ref reference, .. } if reference == "other"));
    assert_eq!(err.field(), Some("age"));
}

// ============================================================================
// STOP-ON-FAIL
// ============================================================================

#[test]
fn stopall_keeps_earlier_findings_and_skips_the_rest() {
    let v = engine(&[
        &["a", "STR", "REQ:A_REQ"],
        &["b", "INT", "STOPALL", "RANGE:1:5:B_RANGE"],
        &["c", "STR", "REQ:C_REQ"],
    ]);

    let errors = v.validate(&json!({ "b": 9 })).unwrap();
    assert_eq!(
        errors,
        vec![
            FieldErrors::new("a", ["A_REQ"]),
            FieldErrors::new("b", ["B_RANGE"]),
        ]
    );
}

#[test]
fn stopall_without_failure_continues() {
    let v = engine(&[
        &["b", "INT", "STOPALL", "RANGE:1:5:B_RANGE"],
        &["c", "STR", "REQ:C_REQ"],
    ]);
    let errors = v.validate(&json!({ "b": 3 })).unwrap();
    assert_eq!(errors, vec![FieldErrors::new("c", ["C_REQ"])]);
}

// ============================================================================
// UNEXPECTED ERRORS
// ============================================================================

#[test]
fn non_object_parent_aborts_the_call() {
    let v = engine(&[&["name", "STR"], &["a.b", "STR"]]);
    let err = v.validate(&json!({ "name": "x", "a": [1] })).unwrap_err();
    assert_eq!(err.stage, Stage::PresenceCheck);
    assert!(matches!(err.source, SubjectError::NotAnObject { ref path, .. } if path == "a"));
}

#[test]
fn non_object_root_aborts_the_call() {
    let v = engine(&[&["name", "STR"]]);
    let err = v.validate(&json!(["name"])).unwrap_err();
    assert!(matches!(err.source, SubjectError::NotAnObject { ref path, .. } if path == "$"));
}

#[test]
fn external_failure_aborts_with_no_findings() {
    let components = ComponentRegistry::new();
    components.register("even", |v: &Value| -> Result<bool, ExternalError> {
        v.as_i64().map(|n| n % 2 == 0).ok_or_else(|| "not an integer".into())
    });
    components.register("offline", |_: &Value| -> Result<bool, ExternalError> {
        Err("service unavailable".into())
    });

    let v = RuleValidatorBuilder::new(vec![
        vec!["n", "INT", "EXT:even:ODD"],
        vec!["m", "INT", "EXT:offline"],
    ])
    .default_error_code("INVALID")
    .component_lookup(Arc::new(components))
    .build()
    .unwrap();

    assert_eq!(
        v.validate(&json!({ "n": 3 })).unwrap(),
        vec![FieldErrors::new("n", ["ODD"])]
    );

    let err = v.validate(&json!({ "n": 3, "m": 1 })).unwrap_err();
    assert_eq!(err.field, "m");
    assert!(err.to_string().contains("'m'"));
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

fn config_error(rule: &[&str]) -> ConfigError {
    RuleValidatorBuilder::new(vec![rule.to_vec()])
        .default_error_code("INVALID")
        .build()
        .unwrap_err()
}

#[test]
fn configuration_errors_name_the_field() {
    let errors = [
        config_error(&["a", "REQ"]),
        config_error(&["a", "STR", "NOPE"]),
        config_error(&["a", "STR", "LEN:1"]),
        config_error(&["a", "INT", "RANGE:x:1"]),
    ];

    assert!(matches!(errors[0], ConfigError::UnknownRuleType { .. }));
    assert!(matches!(errors[1], ConfigError::UnknownOperation { .. }));
    assert!(matches!(errors[2], ConfigError::Arity { .. }));
    assert!(matches!(errors[3], ConfigError::InvalidParameter { .. }));
    for err in &errors {
        assert_eq!(err.field(), Some("a"), "{err:?}");
    }
}

#[test]
fn first_marker_decides_the_type() {
    let err = config_error(&["a", "INT", "STR"]);
    assert!(matches!(
        err,
        ConfigError::UnknownOperation { rule_type: RuleType::Int, ref operation, .. } if operation == "STR"
    ));
}

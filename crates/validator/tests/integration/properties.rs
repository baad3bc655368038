//! Property-based tests.

use proptest::prelude::*;
use ruleval_validator::op::{decompose, escape, join};
use ruleval_validator::rule::path_dependencies;
use ruleval_validator::{ConfigError, FieldErrors, RuleValidatorBuilder};
use serde_json::json;

use super::engine;

// ============================================================================
// DSL
// ============================================================================

proptest! {
    #[test]
    fn escaped_token_survives_decomposition(token in "[a-z:]{1,12}") {
        prop_assert_eq!(decompose(&escape(&token)), vec![token]);
    }

    #[test]
    fn join_then_decompose(
        head in "[A-Z][A-Z:]{0,6}",
        tail in prop::collection::vec("[a-z0-9][a-z0-9:,]{0,6}", 0..4),
    ) {
        let mut tokens = vec![head];
        tokens.extend(tail);
        prop_assert_eq!(decompose(&join(&tokens)), tokens);
    }

    #[test]
    fn short_rules_never_build(rule in prop::collection::vec("[A-Z]{1,5}", 0..2)) {
        let result = RuleValidatorBuilder::new(vec![rule])
            .default_error_code("X")
            .build();
        let too_short = matches!(result, Err(ConfigError::RuleTooShort { .. }));
        prop_assert!(too_short);
    }

    #[test]
    fn dependencies_are_proper_prefixes(segments in prop::collection::vec("[a-z]{1,4}", 1..5)) {
        let path = segments.join(".");
        let deps: Vec<String> = path_dependencies(&path).into_iter().collect();
        let expected: Vec<String> = (1..segments.len()).map(|n| segments[..n].join(".")).collect();
        prop_assert_eq!(deps, expected);
    }
}

// ============================================================================
// ENGINE
// ============================================================================

proptest! {
    #[test]
    fn range_findings_match_bounds(n in -1000_i64..1000) {
        let v = engine(&[&["n", "INT", "RANGE:-10:10:OUT"]]);
        let errors = v.validate(&json!({ "n": n })).unwrap();
        if (-10..=10).contains(&n) {
            prop_assert!(errors.is_empty());
        } else {
            prop_assert_eq!(errors, vec![FieldErrors::new("n", ["OUT"])]);
        }
    }

    #[test]
    fn length_counts_characters(s in "\\PC{0,20}") {
        let v = engine(&[&["s", "STR", "LEN:3:8:LEN"]]);
        let errors = v.validate(&json!({ "s": s })).unwrap();
        let len = s.chars().count();
        let expect_error = len > 0 && !(3..=8).contains(&len);
        prop_assert_eq!(!errors.is_empty(), expect_error);
    }

    #[test]
    fn validation_is_deterministic(name in proptest::option::of("[a-z ]{0,6}"), age in proptest::option::of(any::<i64>())) {
        let v = engine(&[&["name", "STR", "TRIM", "REQ"], &["age", "INT", "RANGE:0:150"]]);
        let subject = json!({ "name": name, "age": age });
        prop_assert_eq!(v.validate(&subject).unwrap(), v.validate(&subject).unwrap());
    }
}

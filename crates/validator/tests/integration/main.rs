//! Integration tests for ruleval-validator.

mod concurrency;
mod config;
mod properties;
mod scenarios;

use ruleval_validator::{RuleValidator, RuleValidatorBuilder};

/// Builds an engine with `INVALID` as the default code.
pub fn engine(rules: &[&[&str]]) -> RuleValidator {
    RuleValidatorBuilder::new(rules.iter().map(|r| r.iter().copied()))
        .default_error_code("INVALID")
        .build()
        .expect("rules compile")
}

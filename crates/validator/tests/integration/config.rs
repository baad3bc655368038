//! Engines built from configuration documents.

use std::io::Write;

use pretty_assertions::assert_eq;
use ruleval_validator::{ConfigError, ErrorCatalog, FieldErrors, ValidatorConfig};
use serde_json::json;

const RULES: &str = r#"
name = "signup"
default_error_code = "INVALID"
rules = [
    ["email", "STR", "TRIM", "REQ:EMAIL_REQ", "REG:[^@\\s]+@[^@\\s]+:EMAIL_FMT"],
    ["password", "STR", "REQ:PW_REQ", "LEN:8:*:PW_SHORT"],
    ["profile", "OBJ"],
    ["profile.age", "RULE:age"],
    ["terms", "BOOL", "REQ:TERMS_REQ", "IS:true:TERMS_REJECTED"],
]

[rule_registry]
age = ["INT", "RANGE:13:*:TOO_YOUNG"]
"#;

#[test]
fn signup_rules_from_toml() {
    let engine = ValidatorConfig::from_toml_str(RULES)
        .unwrap()
        .into_builder()
        .build()
        .unwrap();

    let errors = engine
        .validate(&json!({
            "email": " not-an-email ",
            "password": "short",
            "profile": { "age": 9 },
            "terms": false,
        }))
        .unwrap();

    assert_eq!(
        errors,
        vec![
            FieldErrors::new("email", ["EMAIL_FMT"]),
            FieldErrors::new("password", ["PW_SHORT"]),
            FieldErrors::new("profile.age", ["TOO_YOUNG"]),
            FieldErrors::new("terms", ["TERMS_REJECTED"]),
        ]
    );

    let ok = json!({
        "email": "ada@example.com",
        "password": "correct horse",
        "terms": true,
    });
    assert!(engine.validate(&ok).unwrap().is_empty());
}

#[test]
fn catalog_covers_the_rule_set() {
    let engine = ValidatorConfig::from_toml_str(RULES)
        .unwrap()
        .into_builder()
        .build()
        .unwrap();

    let catalog = ErrorCatalog::from_toml_str(
        r#"
        [messages]
        INVALID = "Invalid value"
        EMAIL_REQ = "Email is required"
        EMAIL_FMT = "Email is malformed"
        PW_REQ = "Password is required"
        PW_SHORT = "Password is too short"
        TOO_YOUNG = "Too young"
        TERMS_REQ = "Terms must be answered"
        "#,
    )
    .unwrap();

    let missing = catalog.verify([&engine]).unwrap_err();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].component, "signup");
    assert_eq!(missing[0].code, "TERMS_REJECTED");

    let rendered = catalog.render(&engine.validate(&json!({ "terms": true })).unwrap());
    let messages: Vec<_> = rendered.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["Email is required", "Password is required"]);
}

#[test]
fn broken_file_is_a_configuration_error() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{ "rules": [["a", "STR", "LEN:9:1"]] }"#).unwrap();

    let err = ValidatorConfig::from_path(file.path())
        .unwrap()
        .into_builder()
        .default_error_code("X")
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidParameter { .. }));

    file.write_all(b"garbage").unwrap();
    assert!(matches!(
        ValidatorConfig::from_path(file.path()),
        Err(ConfigError::Json(_))
    ));
}

//! # ruleval-validator
//!
//! A rule-driven validator for JSON-like payloads.
//!
//! Rules are plain string lists, so they can live in configuration files:
//! the first element names a (possibly dotted) field, the second names its
//! type and every further element is a directive.
//!
//! ## Quick Start
//!
//! ```rust
//! use ruleval_validator::prelude::*;
//! use serde_json::json;
//!
//! let validator = RuleValidatorBuilder::new(vec![
//!     vec!["user", "OBJ", "REQ"],
//!     vec!["user.email", "STR", "TRIM", "REQ:EMAIL_MISSING", "REG:[^@]+@[^@]+"],
//!     vec!["user.age", "INT", "RANGE:18:*:TOO_YOUNG"],
//! ])
//! .default_error_code("INVALID")
//! .build()?;
//!
//! let errors = validator.validate(&json!({ "user": { "age": 12 } }))?;
//! assert_eq!(errors[0].field, "user.email");
//! assert_eq!(errors[1].error_codes, ["TOO_YOUNG"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Layout
//!
//! - [`engine`]: the build phase ([`RuleValidatorBuilder`]) and the
//!   execution phase ([`RuleValidator`]).
//! - [`builders`]: one [`ValidatorBuilder`](builders::ValidatorBuilder) per
//!   rule type and the directive catalogue.
//! - [`registry`]: named rule bodies for `RULE:name` and external
//!   components for `EXT:name`.
//! - [`catalog`]: code to message mapping and startup verification.
//! - [`config`]: TOML and JSON loading.

pub mod builders;
pub mod catalog;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod op;
pub mod prelude;
pub mod registry;
pub mod rule;
pub mod subject;
pub mod validator;

pub use catalog::{ErrorCatalog, ErrorCodeUser, MissingCode, RenderedFieldError};
pub use config::ValidatorConfig;
pub use context::{FieldErrors, ValidationContext, ValidationResult};
pub use engine::{RuleValidator, RuleValidatorBuilder};
pub use error::{ConfigError, ConfigResult, Stage, SubjectError, ValidateError};
pub use registry::{
    ComponentLookup, ComponentRegistry, ExternalError, ExternalValidator, RuleRegistry,
};
pub use rule::RuleType;
pub use validator::Validator;

//! Prelude module for convenient imports.
//!
//! ```rust
//! use ruleval_validator::prelude::*;
//!
//! let registry: RuleRegistry = [("ageRule", vec!["INT", "RANGE:0:150"])]
//!     .into_iter()
//!     .collect();
//! assert!(registry.exists("ageRule"));
//! ```

pub use crate::catalog::{ErrorCatalog, ErrorCodeUser};
pub use crate::config::ValidatorConfig;
pub use crate::context::FieldErrors;
pub use crate::engine::{RuleValidator, RuleValidatorBuilder};
pub use crate::error::{ConfigError, ConfigResult, SubjectError, ValidateError};
pub use crate::registry::{
    ComponentLookup, ComponentRegistry, ExternalError, ExternalValidator, RuleRegistry,
};
pub use crate::rule::RuleType;

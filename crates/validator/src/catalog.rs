//! Error-code catalog
//!
//! Validators only emit codes. A catalog maps each code to a client-facing
//! message, can verify at startup that every code some component may emit
//! has a message, and renders [`FieldErrors`] for a response body.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{self, Format};
use crate::context::FieldErrors;
use crate::error::ConfigResult;

/// A component that emits error codes.
pub trait ErrorCodeUser {
    /// Codes the component may emit and the component's name.
    fn error_codes_in_use(&self) -> (&BTreeSet<String>, &str);
}

impl<T: ErrorCodeUser + ?Sized> ErrorCodeUser for &T {
    fn error_codes_in_use(&self) -> (&BTreeSet<String>, &str) {
        (**self).error_codes_in_use()
    }
}

impl<T: ErrorCodeUser + ?Sized> ErrorCodeUser for std::sync::Arc<T> {
    fn error_codes_in_use(&self) -> (&BTreeSet<String>, &str) {
        (**self).error_codes_in_use()
    }
}

/// A code some component uses that the catalog has no message for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissingCode {
    /// Name of the component using the code.
    pub component: String,
    /// The code without a message.
    pub code: String,
}

impl fmt::Display for MissingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component '{}' uses error code '{}' which has no message",
            self.component, self.code
        )
    }
}

/// One finding ready for a client response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Code to message map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorCatalog {
    #[serde(default)]
    messages: BTreeMap<String, String>,
}

impl ErrorCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from TOML (`[messages]` table).
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        config::parse(source, Format::Toml)
    }

    /// Parses a catalog from JSON (`{"messages": {...}}`).
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        config::parse(source, Format::Json)
    }

    /// Loads a catalog from a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        config::load(path.as_ref())
    }

    /// Adds or replaces a message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(code.into(), message.into());
        self
    }

    /// The message for `code`.
    pub fn message(&self, code: &str) -> Option<&str> {
        self.messages.get(code).map(String::as_str)
    }

    /// Checks that every code used by `users` has a message.
    ///
    /// # Errors
    ///
    /// Returns every missing code, sorted by component then code.
    pub fn verify<'a, I, U>(&self, users: I) -> Result<(), Vec<MissingCode>>
    where
        I: IntoIterator<Item = &'a U>,
        U: ErrorCodeUser + ?Sized + 'a,
    {
        let mut missing: Vec<MissingCode> = users
            .into_iter()
            .flat_map(|user| {
                let (codes, component) = user.error_codes_in_use();
                codes
                    .iter()
                    .filter(|code| !self.messages.contains_key(*code))
                    .map(move |code| MissingCode {
                        component: component.to_owned(),
                        code: code.clone(),
                    })
            })
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        missing.sort();
        for m in &missing {
            tracing::warn!(component = %m.component, code = %m.code, "error code has no message");
        }
        Err(missing)
    }

    /// Flattens findings into one entry per code, with the code itself as
    /// the message when the catalog has none.
    pub fn render(&self, errors: &[FieldErrors]) -> Vec<RenderedFieldError> {
        errors
            .iter()
            .flat_map(|fe| {
                fe.error_codes.iter().map(|code| RenderedFieldError {
                    field: fe.field.clone(),
                    code: code.clone(),
                    message: self.message(code).unwrap_or(code).to_owned(),
                })
            })
            .collect()
    }
}

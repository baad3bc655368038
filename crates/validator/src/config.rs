//! File-backed engine configuration
//!
//! A rule set can live in a TOML or JSON document:
//!
//! ```toml
//! name = "create-user"
//! default_error_code = "INVALID"
//! rules = [
//!     ["name", "STR", "REQ:NAME_MISSING", "LEN:1:64"],
//!     ["age", "RULE:ageRule"],
//! ]
//!
//! [rule_registry]
//! ageRule = ["INT", "RANGE:0:150:AGE_RANGE"]
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::RuleValidatorBuilder;
use crate::error::{ConfigError, ConfigResult};
use crate::registry::RuleRegistry;

/// Document formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

pub(crate) fn parse<T: DeserializeOwned>(source: &str, format: Format) -> ConfigResult<T> {
    Ok(match format {
        Format::Toml => toml::from_str(source)?,
        Format::Json => serde_json::from_str(source)?,
    })
}

pub(crate) fn load<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, "loading configuration");
    parse(&source, format)
}

/// Serializable form of a [`RuleValidatorBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_error_code: String,
    pub rules: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_registry: Option<RuleRegistry>,
}

impl ValidatorConfig {
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        parse(source, Format::Toml)
    }

    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        parse(source, Format::Json)
    }

    /// Loads a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedFormat`] for any other extension,
    /// [`ConfigError::Io`] when the file cannot be read, and the parser's
    /// error for malformed content.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        load(path.as_ref())
    }

    /// Converts into a builder; components still have to be attached.
    pub fn into_builder(self) -> RuleValidatorBuilder {
        let mut builder = RuleValidatorBuilder::new(self.rules)
            .name(self.name)
            .default_error_code(self.default_error_code);
        if let Some(registry) = self.rule_registry {
            builder = builder.rule_registry(registry);
        }
        builder
    }
}

//! Rule-level parsing: type markers, `RULE:` references and field paths

use std::fmt;

use indexmap::IndexSet;

use crate::error::{ConfigError, ConfigResult};
use crate::op::decompose;
use crate::registry::RuleRegistry;

/// Marker of a directive that substitutes a named rule body.
pub const RULE_REF_CODE: &str = "RULE";

/// Separator between the segments of a field path.
pub const PATH_SEPARATOR: char = '.';

/// The value type a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleType {
    /// `STR`: a string.
    Str,
    /// `OBJ`: a nested object or an array.
    Obj,
    /// `BOOL`: a boolean.
    Bool,
    /// `INT`: an integer fitting in `i64`.
    Int,
    /// `FLOAT`: any number.
    Float,
}

impl RuleType {
    /// Every rule type, in marker lookup order.
    pub const ALL: [RuleType; 5] = [Self::Str, Self::Obj, Self::Bool, Self::Int, Self::Float];

    /// The marker that selects this type in a rule.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Obj => "OBJ",
            Self::Bool => "BOOL",
            Self::Int => "INT",
            Self::Float => "FLOAT",
        }
    }

    /// Parses a marker.
    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.marker() == marker)
    }

    /// Determines a rule's type from its directives.
    ///
    /// The first directive whose leading component is a type marker wins.
    pub fn extract<S: AsRef<str>>(field: &str, rule: &[S]) -> ConfigResult<Self> {
        rule.iter()
            .find_map(|op| {
                let parts = decompose(op.as_ref());
                parts.first().and_then(|name| Self::from_marker(name))
            })
            .ok_or_else(|| ConfigError::UnknownRuleType {
                field: field.to_owned(),
                rule: rule.iter().map(|s| s.as_ref().to_owned()).collect(),
            })
    }

    /// The error code a rule of this type emits when a directive carries no
    /// override: the second component of the type marker (`STR:BAD_NAME`)
    /// if present, else `fallback`.
    pub fn default_error_code<S: AsRef<str>>(self, rule: &[S], fallback: &str) -> String {
        rule.iter()
            .map(|op| decompose(op.as_ref()))
            .find(|parts| parts[0] == self.marker())
            .and_then(|mut parts| (parts.len() > 1).then(|| parts.swap_remove(1)))
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| fallback.to_owned())
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Returns the referenced rule name if `op` is a `RULE:name` directive.
pub fn rule_reference(op: &str) -> Option<String> {
    let mut parts = decompose(op);
    if parts.len() == 2 && parts[0] == RULE_REF_CODE {
        parts.pop()
    } else {
        None
    }
}

/// Returns the directives to compile for `rule` (`[field, directive, ...]`).
///
/// A rule whose second token is a `RULE:name` reference is replaced by the
/// registry's body for `name`; any other rule yields its own directives.
pub fn resolve_directives(
    rule: &[String],
    registry: Option<&RuleRegistry>,
) -> ConfigResult<Vec<String>> {
    let [field, first, ..] = rule else {
        return Err(ConfigError::RuleTooShort {
            rule: rule.to_vec(),
        });
    };

    let Some(reference) = rule_reference(first) else {
        return Ok(rule[1..].to_vec());
    };

    let registry = registry.ok_or_else(|| ConfigError::MissingRuleRegistry {
        field: field.clone(),
        reference: reference.clone(),
    })?;

    registry
        .rule(&reference)
        .map(<[String]>::to_vec)
        .ok_or_else(|| ConfigError::UnknownRuleReference {
            field: field.clone(),
            reference,
        })
}

/// Every proper prefix of a dotted field path, shortest first.
///
/// ```
/// use ruleval_validator::rule::path_dependencies;
///
/// let deps: Vec<_> = path_dependencies("a.b.c").into_iter().collect();
/// assert_eq!(deps, ["a", "a.b"]);
/// assert!(path_dependencies("a").is_empty());
/// ```
pub fn path_dependencies(path: &str) -> IndexSet<String> {
    path.match_indices(PATH_SEPARATOR)
        .map(|(i, _)| path[..i].to_owned())
        .collect()
}

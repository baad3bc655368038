//! Directive decomposition
//!
//! A directive is a colon separated operation such as `LEN:1:10` or
//! `MEX:a,b:CODE`. A literal colon inside a component is written as a
//! doubled colon, so `IN:a::b,c` has the single parameter `a:b,c`.

use smallvec::SmallVec;

use crate::error::{ConfigError, ConfigResult};

/// Component separator inside a directive.
pub const SEPARATOR: char = ':';

/// Separator between the members of a list parameter (`IN`, `MEX`).
pub const LIST_SEPARATOR: char = ',';

/// Splits a directive on [`SEPARATOR`], turning doubled separators back
/// into literal ones.
///
/// Escapes are recognised left to right, so `a:::b` reads as an escaped
/// colon followed by a separator and yields `["a:", "b"]`. An empty input
/// yields a single empty component.
///
/// # Examples
///
/// ```
/// use ruleval_validator::op::decompose;
///
/// assert_eq!(decompose("LEN:1:10"), vec!["LEN", "1", "10"]);
/// assert_eq!(decompose("IN:a::b"), vec!["IN", "a:b"]);
/// assert_eq!(decompose(""), vec![""]);
/// ```
pub fn decompose(op: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = op.chars().peekable();

    while let Some(c) = chars.next() {
        if c != SEPARATOR {
            current.push(c);
            continue;
        }

        if chars.peek() == Some(&SEPARATOR) {
            chars.next();
            current.push(SEPARATOR);
        } else {
            parts.push(std::mem::take(&mut current));
        }
    }

    parts.push(current);
    parts
}

/// Escapes every separator in `token` so it survives [`decompose`].
pub fn escape(token: &str) -> String {
    token.replace(SEPARATOR, "::")
}

/// Joins tokens into a directive, escaping each one.
///
/// `decompose(&join(tokens)) == tokens` holds for non-empty tokens where
/// every token after the first does not start with a colon; anything else
/// is ambiguous in the directive grammar.
pub fn join<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| escape(t.as_ref()))
        .collect::<Vec<_>>()
        .join(":")
}

/// A decomposed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    parts: SmallVec<[String; 4]>,
}

impl Operation {
    /// Decomposes a raw directive.
    pub fn parse(raw: &str) -> Self {
        Self {
            parts: decompose(raw).into_iter().collect(),
        }
    }

    /// The directive name (first component).
    pub fn name(&self) -> &str {
        // decompose always yields at least one component
        self.parts.first().map_or("", String::as_str)
    }

    /// Number of components including the name.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the operation has no components.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Component at `index` (0 is the name).
    pub fn part(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    /// Fails unless the component count is within `min..=max`.
    pub fn expect_arity(&self, field: &str, min: usize, max: usize) -> ConfigResult<()> {
        let actual = self.len();
        if (min..=max).contains(&actual) {
            Ok(())
        } else {
            Err(ConfigError::Arity {
                field: field.to_owned(),
                operation: self.name().to_owned(),
                min,
                max,
                actual,
            })
        }
    }

    /// Error code to emit for this directive: the component at `index` when
    /// present and non-empty, otherwise `default`.
    pub fn code_or(&self, index: usize, field: &str, default: &str) -> ConfigResult<String> {
        let code = match self.part(index) {
            Some(code) if !code.is_empty() => code,
            _ => default,
        };

        if code.is_empty() {
            return Err(ConfigError::MissingErrorCode {
                field: field.to_owned(),
                operation: self.name().to_owned(),
            });
        }

        Ok(code.to_owned())
    }

    /// Splits the component at `index` on [`LIST_SEPARATOR`], trimming each
    /// member and dropping empty ones.
    pub fn list(&self, index: usize) -> Vec<String> {
        self.part(index)
            .unwrap_or_default()
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Builds an [`ConfigError::InvalidParameter`] for this directive.
    pub fn invalid(&self, field: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidParameter {
            field: field.to_owned(),
            operation: self.name().to_owned(),
            reason: reason.into(),
        }
    }
}
